use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::schema::foodlog;
use crate::units::Quantity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub(crate) struct Food {
    pub id: i32,
    pub name: String,
}

impl Food {
    pub(crate) fn list_to_bytes(foods: &[Food]) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(foods)
    }

    pub(crate) fn list_from_bytes(bytes: &[u8]) -> Result<Vec<Food>, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Queryable)]
pub(crate) struct Relationship {
    pub food_id: i32,       //foreign key
    pub ingredient_id: i32, //foreign key
    pub grams: i32,         //amount of ingredient that is used for food
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub(crate) struct Ingredient {
    pub id: i32,
    pub name: String,
    pub calorie_per_gram: i32,
}

/// One consumption event: `amount` of `quantity` units of a food.
///
/// Nutrients are optional and describe the whole entry: calories in kcal,
/// calcium and sodium in mg, everything else in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable)]
pub(crate) struct FoodLog {
    pub id: i32,
    pub food_id: i32,
    pub quantity: Quantity,
    pub amount: f64,
    pub logged_at: NaiveDateTime,
    pub calcium: Option<f64>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub protein: Option<f64>,
    pub sodium: Option<f64>,
    pub sugar: Option<f64>,
}

// logged_at is filled in by the column default
#[derive(Debug, Clone, PartialEq, Deserialize, Insertable)]
#[table_name = "foodlog"]
pub(crate) struct NewFoodLog {
    pub food_id: i32,
    pub quantity: Quantity,
    pub amount: f64,
    pub calcium: Option<f64>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub protein: Option<f64>,
    pub sodium: Option<f64>,
    pub sugar: Option<f64>,
}

impl NewFoodLog {
    pub(crate) fn new(food_id: i32, quantity: Quantity, amount: f64) -> Self {
        NewFoodLog {
            food_id,
            quantity,
            amount,
            calcium: None,
            calories: None,
            carbs: None,
            fat: None,
            fiber: None,
            protein: None,
            sodium: None,
            sugar: None,
        }
    }

    fn nutrients(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("calcium", self.calcium),
            ("calories", self.calories),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("protein", self.protein),
            ("sodium", self.sodium),
            ("sugar", self.sugar),
        ]
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ApiError::Validation(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        for (name, value) in self.nutrients() {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ApiError::Validation(format!(
                        "{} must be zero or more, got {}",
                        name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

/// API shape of a food log, carrying the unit label next to the stored token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FoodLogView {
    #[serde(flatten)]
    pub log: FoodLog,
    pub quantity_label: &'static str,
}

impl From<FoodLog> for FoodLogView {
    fn from(log: FoodLog) -> Self {
        let quantity_label = log.quantity.label();
        FoodLogView {
            log,
            quantity_label,
        }
    }
}
