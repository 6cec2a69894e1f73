use std::collections::HashMap;

use diesel::prelude::*;

use crate::error::ApiError;
use crate::models::{Food, FoodLog, Ingredient, NewFoodLog, Relationship};
use crate::schema::{food, foodlog, ingredient, relationship};

no_arg_sql_function!(
    last_insert_id,
    diesel::sql_types::Unsigned<diesel::sql_types::Bigint>
);

pub(crate) fn find_all_foods(conn: &MysqlConnection) -> Result<Vec<Food>, ApiError> {
    Ok(food::table.order(food::id.asc()).load::<Food>(conn)?)
}

pub(crate) fn find_all_ingredients(conn: &MysqlConnection) -> Result<Vec<Ingredient>, ApiError> {
    Ok(ingredient::table
        .order(ingredient::id.asc())
        .load::<Ingredient>(conn)?)
}

/// Total calories of one food: grams of each ingredient times its calories per gram.
pub(crate) fn find_calorie(food_id: i32, conn: &MysqlConnection) -> Result<i64, ApiError> {
    ensure_food_exists(food_id, conn)?;

    let parts = relationship::table
        .filter(relationship::food_id.eq(food_id))
        .load::<Relationship>(conn)?;
    let ingredient_ids: Vec<i32> = parts.iter().map(|part| part.ingredient_id).collect();

    let calorie_per_gram: HashMap<i32, i32> = ingredient::table
        .filter(ingredient::id.eq_any(ingredient_ids))
        .select((ingredient::id, ingredient::calorie_per_gram))
        .load::<(i32, i32)>(conn)?
        .into_iter()
        .collect();

    Ok(parts
        .iter()
        .map(|part| {
            let per_gram = calorie_per_gram
                .get(&part.ingredient_id)
                .copied()
                .unwrap_or_default();
            i64::from(part.grams) * i64::from(per_gram)
        })
        .sum())
}

pub(crate) fn insert_food_log(
    new_log: &NewFoodLog,
    conn: &MysqlConnection,
) -> Result<FoodLog, ApiError> {
    new_log.validate()?;

    conn.transaction::<_, ApiError, _>(|| {
        ensure_food_exists(new_log.food_id, conn)?;

        diesel::insert_into(foodlog::table)
            .values(new_log)
            .execute(conn)?;

        //mysql has no RETURNING, so read the row back by the id it was given
        let inserted: u64 = diesel::select(last_insert_id).first(conn)?;
        let inserted = i32::try_from(inserted)
            .map_err(|err| diesel::result::Error::DeserializationError(Box::new(err)))?;
        Ok(foodlog::table.find(inserted).first::<FoodLog>(conn)?)
    })
}

pub(crate) fn find_food_log(log_id: i32, conn: &MysqlConnection) -> Result<FoodLog, ApiError> {
    foodlog::table
        .find(log_id)
        .first::<FoodLog>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(format!("food log {}", log_id)))
}

/// Logs of one food, newest first.
pub(crate) fn find_food_logs(food_id: i32, conn: &MysqlConnection) -> Result<Vec<FoodLog>, ApiError> {
    ensure_food_exists(food_id, conn)?;

    Ok(foodlog::table
        .filter(foodlog::food_id.eq(food_id))
        .order((foodlog::logged_at.desc(), foodlog::id.desc()))
        .load::<FoodLog>(conn)?)
}

fn ensure_food_exists(food_id: i32, conn: &MysqlConnection) -> Result<(), ApiError> {
    food::table
        .find(food_id)
        .select(food::id)
        .first::<i32>(conn)
        .optional()?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("food {}", food_id)))
}
