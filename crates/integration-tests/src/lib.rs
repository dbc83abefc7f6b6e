//! Shared fixtures for Saltline integration tests.
//!
//! The product set mirrors the live store closely enough to exercise every
//! bundle recipe: two polos, tees, a linen set, and the one-size boat cap.

#![allow(clippy::missing_panics_doc)]

use rust_decimal::Decimal;
use saltline_core::{Image, Money, OptionAxis, OptionValue, Product, SelectedOption, Variant};

/// A USD amount from a decimal string.
#[must_use]
pub fn usd(amount: &str) -> Money {
    Money::new(amount.parse::<Decimal>().expect("valid decimal"), "USD")
}

/// A variant with the given option assignment.
#[must_use]
pub fn variant(id: &str, options: &[(&str, &str)], price: &str, available: bool) -> Variant {
    Variant {
        id: id.to_string(),
        selected_options: options
            .iter()
            .map(|(name, value)| SelectedOption {
                name: (*name).to_string(),
                value: (*value).to_string(),
            })
            .collect(),
        price: usd(price),
        compare_at_price: None,
        available_for_sale: available,
        image: Some(Image {
            url: format!("https://cdn.saltline.shop/{id}.jpg"),
            alt_text: None,
        }),
    }
}

/// An option axis with plain (swatch-less) values.
#[must_use]
pub fn axis(name: &str, values: &[&str]) -> OptionAxis {
    OptionAxis {
        name: name.to_string(),
        values: values.iter().map(|v| OptionValue::plain(*v)).collect(),
    }
}

/// Classic polo: Black/White in M/L, 40.00 each, all combinations made,
/// White/L sold out.
#[must_use]
pub fn polo_classic() -> Product {
    Product {
        id: "gid://shop/Product/1".to_string(),
        handle: "polo-classic".to_string(),
        title: "Classic Polo".to_string(),
        options: vec![axis("Color", &["Black", "White"]), axis("Size", &["M", "L"])],
        variants: vec![
            variant("pc-black-m", &[("Color", "Black"), ("Size", "M")], "40.00", true),
            variant("pc-black-l", &[("Color", "Black"), ("Size", "L")], "40.00", true),
            variant("pc-white-m", &[("Color", "White"), ("Size", "M")], "40.00", true),
            variant("pc-white-l", &[("Color", "White"), ("Size", "L")], "40.00", false),
        ],
    }
}

/// Pique polo: White/Navy in M/L, 45.00 each; Navy/L was never produced.
#[must_use]
pub fn polo_pique() -> Product {
    Product {
        id: "gid://shop/Product/2".to_string(),
        handle: "polo-pique".to_string(),
        title: "Pique Polo".to_string(),
        options: vec![axis("Color", &["White", "Navy"]), axis("Size", &["M", "L"])],
        variants: vec![
            variant("pp-white-m", &[("Color", "White"), ("Size", "M")], "45.00", true),
            variant("pp-white-l", &[("Color", "White"), ("Size", "L")], "45.00", true),
            variant("pp-navy-m", &[("Color", "Navy"), ("Size", "M")], "45.00", true),
        ],
    }
}

/// Crew tee: single color, three sizes, 28.00.
#[must_use]
pub fn tee_crew() -> Product {
    Product {
        id: "gid://shop/Product/3".to_string(),
        handle: "tee-crew".to_string(),
        title: "Crew Tee".to_string(),
        options: vec![axis("Color", &["Ecru"]), axis("Size", &["S", "M", "L"])],
        variants: vec![
            variant("tc-ecru-s", &[("Color", "Ecru"), ("Size", "S")], "28.00", true),
            variant("tc-ecru-m", &[("Color", "Ecru"), ("Size", "M")], "28.00", true),
            variant("tc-ecru-l", &[("Color", "Ecru"), ("Size", "L")], "28.00", true),
        ],
    }
}

/// Linen shirt, 85.00.
#[must_use]
pub fn linen_shirt() -> Product {
    Product {
        id: "gid://shop/Product/4".to_string(),
        handle: "linen-shirt".to_string(),
        title: "Linen Shirt".to_string(),
        options: vec![axis("Color", &["Sand"]), axis("Size", &["M", "L"])],
        variants: vec![
            variant("ls-sand-m", &[("Color", "Sand"), ("Size", "M")], "85.00", true),
            variant("ls-sand-l", &[("Color", "Sand"), ("Size", "L")], "85.00", true),
        ],
    }
}

/// Linen trousers, 95.00.
#[must_use]
pub fn linen_trouser() -> Product {
    Product {
        id: "gid://shop/Product/5".to_string(),
        handle: "linen-trouser".to_string(),
        title: "Linen Trousers".to_string(),
        options: vec![axis("Color", &["Sand"]), axis("Size", &["M", "L"])],
        variants: vec![
            variant("lt-sand-m", &[("Color", "Sand"), ("Size", "M")], "95.00", true),
            variant("lt-sand-l", &[("Color", "Sand"), ("Size", "L")], "95.00", true),
        ],
    }
}

/// One-size boat cap, 25.00, no meaningful options.
#[must_use]
pub fn boat_cap() -> Product {
    Product {
        id: "gid://shop/Product/9".to_string(),
        handle: "boat-cap".to_string(),
        title: "Boat Cap".to_string(),
        options: vec![axis("Title", &["Default Title"])],
        variants: vec![variant(
            "cap-default",
            &[("Title", "Default Title")],
            "25.00",
            true,
        )],
    }
}
