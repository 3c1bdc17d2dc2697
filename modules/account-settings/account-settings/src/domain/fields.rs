pub struct ProfileFields;

impl ProfileFields {
    pub const FULL_NAME: &'static str = "full_name";
    pub const USERNAME: &'static str = "username";
    pub const BIO: &'static str = "bio";
    pub const AVATAR: &'static str = "avatar";
    pub const EMAIL: &'static str = "email";
    pub const CURRENT_PASSWORD: &'static str = "current_password";
    pub const NEW_PASSWORD: &'static str = "new_password";
    pub const CONFIRM_PASSWORD: &'static str = "confirm_password";
    pub const DELETION_CONFIRMATION: &'static str = "deletion_confirmation";
}
