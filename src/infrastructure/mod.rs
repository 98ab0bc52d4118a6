pub mod cash_on_delivery;
