use actix_web::{get, post, web, HttpResponse};

use crate::cache::FoodCache;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{FoodLogView, NewFoodLog};
use crate::query;
use crate::units::unit_options;

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .service(get_all_food)
    .service(get_all_ingredients)
    .service(get_calorie)
    .service(get_units)
    .service(create_food_log)
    .service(get_food_log)
    .service(get_food_logs);
}

#[get("/apis/food")]
async fn get_all_food(
    cache: web::Data<FoodCache>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let foods = web::block(move || cache.foods(&pool)).await??;
    Ok(HttpResponse::Ok().json(foods))
}

#[get("/apis/ingredients")]
async fn get_all_ingredients(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let ingredients = web::block(move || {
        let conn = pool.get()?;
        query::find_all_ingredients(&conn)
    })
    .await??;
    Ok(HttpResponse::Ok().json(ingredients))
}

#[get("/apis/calorie/{food_id}")]
async fn get_calorie(
    food_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let calorie = web::block(move || {
        let conn = pool.get()?;
        query::find_calorie(food_id.into_inner(), &conn)
    })
    .await??;
    Ok(HttpResponse::Ok().json(calorie))
}

#[get("/apis/units")]
async fn get_units() -> HttpResponse {
    HttpResponse::Ok().json(unit_options())
}

#[post("/apis/foodlog")]
async fn create_food_log(
    new_log: web::Json<NewFoodLog>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let new_log = new_log.into_inner();
    new_log.validate()?;

    let log = web::block(move || {
        let conn = pool.get()?;
        query::insert_food_log(&new_log, &conn)
    })
    .await??;
    log::info!(
        "logged {} {} of food {} as food log {}",
        log.amount,
        log.quantity,
        log.food_id,
        log.id
    );
    Ok(HttpResponse::Created().json(FoodLogView::from(log)))
}

#[get("/apis/foodlog/{id}")]
async fn get_food_log(id: web::Path<i32>, pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let log = web::block(move || {
        let conn = pool.get()?;
        query::find_food_log(id.into_inner(), &conn)
    })
    .await??;
    Ok(HttpResponse::Ok().json(FoodLogView::from(log)))
}

#[get("/apis/food/{food_id}/logs")]
async fn get_food_logs(
    food_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let logs = web::block(move || {
        let conn = pool.get()?;
        query::find_food_logs(food_id.into_inner(), &conn)
    })
    .await??;
    let logs: Vec<FoodLogView> = logs.into_iter().map(FoodLogView::from).collect();
    Ok(HttpResponse::Ok().json(logs))
}
