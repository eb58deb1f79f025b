/// Stored `role` value that marks an administrator account.
pub const ROLE_ADMIN: &str = "admin";
