//! Table views over the backend records.

mod order_list;
mod product_list;

pub use order_list::*;
pub use product_list::*;
