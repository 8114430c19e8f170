//! Identity handlers: registration, login, token resolution and profiles.

mod authenticate;
mod login;
mod profile;
mod register;

pub use authenticate::AuthenticateHandler;
pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use profile::{GetUserProfileHandler, UpdateProfileCommand, UpdateProfileHandler};
pub use register::{RegisterUserCommand, RegisterUserHandler, RegisterUserResult};
