pub mod disable_user_data;

pub use disable_user_data::{
    DisableUserDataLayer, DisableUserDataMiddleware, ENABLE_USER_DATA,
    UserDataSuppressed, force_user_data_off,
};
