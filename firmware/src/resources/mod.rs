/*
* Resources Hub
*/

/* --------------------------- Library -------------------------- */
use defmt_rtt as _;
use panic_probe as _;

/* --------------------------- Declare Modules -------------------------- */
pub mod config;
pub mod global_resources;
pub mod gpio_list;

pub use config::*;
pub use gpio_list::*;
