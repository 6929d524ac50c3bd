pub mod admin_notification;
pub mod login_code;
pub mod material;
pub mod message;
pub mod notification;
pub mod order;
pub mod quota;
pub mod submission;
pub mod team;
pub mod user;

pub use admin_notification::*;
pub use login_code::*;
pub use material::*;
pub use message::*;
pub use notification::*;
pub use order::*;
pub use quota::*;
pub use submission::*;
pub use team::*;
pub use user::*;
