table! {
    food (id) {
        id -> Int4,
        name -> Varchar,
    }
}

table! {
    foodlog (id) {
        id -> Int4,
        food_id -> Int4,
        quantity -> Varchar,
        amount -> Double,
        logged_at -> Datetime,
        calcium -> Nullable<Double>,
        calories -> Nullable<Double>,
        carbs -> Nullable<Double>,
        fat -> Nullable<Double>,
        fiber -> Nullable<Double>,
        protein -> Nullable<Double>,
        sodium -> Nullable<Double>,
        sugar -> Nullable<Double>,
    }
}

table! {
    ingredient (id) {
        id -> Int4,
        name -> Varchar,
        calorie_per_gram -> Int4,
    }
}

table! {
    relationship (food_id, ingredient_id) {
        food_id -> Int4,
        ingredient_id -> Int4,
        grams -> Int4,
    }
}

joinable!(foodlog -> food (food_id));
joinable!(relationship -> food (food_id));
joinable!(relationship -> ingredient (ingredient_id));

allow_tables_to_appear_in_same_query!(food, foodlog, ingredient, relationship,);
