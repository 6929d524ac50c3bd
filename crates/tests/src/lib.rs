pub mod fixtures;

#[cfg(test)]
mod material_tests;
#[cfg(test)]
mod message_tests;
#[cfg(test)]
mod submission_tests;
#[cfg(test)]
mod team_tests;
