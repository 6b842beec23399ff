mod settings;

pub use settings::{Settings, REDIRECT_URI};
