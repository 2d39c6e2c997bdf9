use std::collections::HashMap;

use diesel::prelude::*;

use crate::models::{
    Menu, MenuWithItems, NewRestaurant, Restaurant, RestaurantChangeset, RestaurantWithMenus,
};
use crate::schema::{menus, restaurants};
use crate::store::menu;

pub fn find_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Restaurant>> {
    restaurants::table
        .order(restaurants::id.asc())
        .select(Restaurant::as_select())
        .load(conn)
}

/// Loads every restaurant together with its menus and each menu's items.
pub fn find_all_with_menus(conn: &mut SqliteConnection) -> QueryResult<Vec<RestaurantWithMenus>> {
    let restaurants = find_all(conn)?;

    let menus = Menu::belonging_to(&restaurants)
        .order(menus::id.asc())
        .select(Menu::as_select())
        .load(conn)?;
    let mut items_by_menu = menus
        .iter()
        .map(|m| m.id)
        .zip(menu::items_grouped(conn, &menus)?)
        .collect::<HashMap<_, _>>();
    let menus = menus.grouped_by(&restaurants);

    Ok(restaurants
        .into_iter()
        .zip(menus)
        .map(|(restaurant, menus)| RestaurantWithMenus {
            restaurant,
            menus: menus
                .into_iter()
                .map(|menu| MenuWithItems {
                    items: items_by_menu.remove(&menu.id).unwrap_or_default(),
                    menu,
                })
                .collect(),
        })
        .collect())
}

pub fn find_by_pk(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Restaurant>> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()
}

pub fn create(conn: &mut SqliteConnection, restaurant: &NewRestaurant) -> QueryResult<Restaurant> {
    diesel::insert_into(restaurants::table)
        .values(restaurant)
        .returning(Restaurant::as_returning())
        .get_result(conn)
}

pub fn create_many(
    conn: &mut SqliteConnection,
    new_restaurants: &[NewRestaurant],
) -> QueryResult<usize> {
    diesel::insert_into(restaurants::table)
        .values(new_restaurants)
        .execute(conn)
}

/// Returns the refreshed row, or `None` when no restaurant has `id`.
pub fn update(
    conn: &mut SqliteConnection,
    id: i32,
    changeset: &RestaurantChangeset,
) -> QueryResult<Option<Restaurant>> {
    diesel::update(restaurants::table.find(id))
        .set(changeset)
        .returning(Restaurant::as_returning())
        .get_result(conn)
        .optional()
}

/// Menus of the removed restaurant stay in place with no owner.
pub fn destroy(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
    diesel::delete(restaurants::table.find(id)).execute(conn)
}

pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    restaurants::table.count().get_result(conn)
}
