pub mod email;
pub mod opt_in;

use self::email::Email;

/// A validated signup, ready to be written to the store.
#[derive(Debug)]
pub struct NewSubscriber {
    pub email: Email,
    pub opt_in: bool,
}
