pub mod logger;
pub mod usb_handler;
pub mod wheel;
