/// console logger setup helper
pub mod logger;
