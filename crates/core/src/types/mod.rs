//! Domain types shared across Saltline crates.

mod cart;
mod money;
mod product;

pub use cart::{CartLineRequest, CartRequest};
pub use money::{Money, MoneyError};
pub use product::{
    Collection, Image, OptionAxis, OptionValue, Product, ProductError, SelectedOption, Variant,
};
