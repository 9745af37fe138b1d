pub mod system_order;
