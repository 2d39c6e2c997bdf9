use bigdecimal::BigDecimal;
use diesel::prelude::*;
use tracing::info;

use crate::db::reset_schema;
use crate::error::StoreError;
use crate::models::{NewItem, NewMenu, NewRestaurant};
use crate::store::{menu, restaurant};

pub const RESTAURANTS: [NewRestaurant<'static>; 3] = [
    NewRestaurant {
        name: "AppleBees",
        location: "Texas",
        cuisine: "FastFood",
    },
    NewRestaurant {
        name: "LittleSheep",
        location: "Dallas",
        cuisine: "Hotpot",
    },
    NewRestaurant {
        name: "Spice Grill",
        location: "Houston",
        cuisine: "Indian",
    },
];

/// Name, image, price in cents, vegetarian.
pub const ITEMS: [(&str, &str, i64, bool); 3] = [
    ("bhindi masala", "someimage.jpg", 950, true),
    ("egusi soup", "someimage.jpg", 1095, false),
    ("hamburger", "someimage.jpg", 650, false),
];

fn new_items() -> Vec<NewItem<'static>> {
    ITEMS
        .iter()
        .map(|&(name, image, cents, vegetarian)| NewItem {
            name,
            image,
            price: BigDecimal::new(cents.into(), 2),
            vegetarian,
        })
        .collect()
}

pub const MENUS: [NewMenu<'static>; 3] = [
    NewMenu {
        title: "Breakfast",
        restaurant_id: None,
    },
    NewMenu {
        title: "Lunch",
        restaurant_id: None,
    },
    NewMenu {
        title: "Dinner",
        restaurant_id: None,
    },
];

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub items: usize,
    pub menus: usize,
}

/// Recreates the schema and loads the fixture rows. Everything previously
/// stored is lost.
pub fn seed(conn: &mut SqliteConnection) -> Result<SeedSummary, StoreError> {
    reset_schema(conn)?;

    let summary = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        Ok(SeedSummary {
            restaurants: restaurant::create_many(conn, &RESTAURANTS)?,
            items: menu::create_items(conn, &new_items())?.len(),
            menus: menu::create_menus(conn, &MENUS)?,
        })
    })?;

    info!(
        restaurants = summary.restaurants,
        items = summary.items,
        menus = summary.menus,
        "seeded database"
    );
    Ok(summary)
}
