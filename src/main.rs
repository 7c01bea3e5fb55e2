use std::path::PathBuf;

use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};

use learning_advisor::analytics::cohort_analytics;
use learning_advisor::data::DatasetStore;
use learning_advisor::engine::AdvisorContext;
use learning_advisor::model::{ForestModel, ModelInfo, RecommendationMap};

#[derive(Parser)]
#[command(name = "learning_advisor")]
#[command(about = "Personalized learning recommendation API")]
struct Args {
    /// Student dataset CSV
    #[arg(long, default_value = "data/personalized_learning.csv")]
    data: PathBuf,
    /// Trained classifier artifact
    #[arg(long, default_value = "artifacts/recommendation_model.json")]
    model: PathBuf,
    /// Label-to-recommendation map artifact
    #[arg(long, default_value = "artifacts/recommendation_map.json")]
    map: PathBuf,
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Deserialize)]
struct RecommendRequest {
    student_id: String,
    #[serde(default)]
    verbose: bool,
}

#[derive(Serialize)]
struct RecommendResponse {
    recommendation: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    student_id: Option<String>,
    prompt: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Serialize)]
struct StudentSummary {
    student_id: String,
    course_name: String,
    engagement_level: String,
}

#[derive(Deserialize)]
struct AnalyticsQuery {
    student_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Learning Advisor API is running!")
}

async fn list_students(ctx: web::Data<AdvisorContext>) -> HttpResponse {
    let students: Vec<StudentSummary> = ctx
        .store()
        .records()
        .iter()
        .map(|record| StudentSummary {
            student_id: record.student_id.clone(),
            course_name: record.course_name.clone(),
            engagement_level: record.engagement_level.to_string(),
        })
        .collect();
    HttpResponse::Ok().json(students)
}

// Engine outcomes are always 200: not-found and degraded error text are
// normal responses, not HTTP failures.
async fn recommend(
    req: web::Json<RecommendRequest>,
    ctx: web::Data<AdvisorContext>,
) -> HttpResponse {
    HttpResponse::Ok().json(RecommendResponse {
        recommendation: ctx.recommend(&req.student_id, req.verbose),
    })
}

async fn chat(req: web::Json<ChatRequest>, ctx: web::Data<AdvisorContext>) -> HttpResponse {
    HttpResponse::Ok().json(ChatResponse {
        response: ctx.respond(req.student_id.as_deref(), &req.prompt),
    })
}

async fn analytics(
    query: web::Query<AnalyticsQuery>,
    ctx: web::Data<AdvisorContext>,
) -> HttpResponse {
    match query.student_id.as_deref() {
        Some(student_id) => match ctx.store().get(student_id) {
            Some(student) => {
                HttpResponse::Ok().json(cohort_analytics(std::slice::from_ref(student)))
            }
            None => HttpResponse::NotFound().json(ErrorBody {
                error: "Student not found.".to_string(),
            }),
        },
        None => HttpResponse::Ok().json(cohort_analytics(ctx.store().records())),
    }
}

async fn model_info(info: web::Data<ModelInfo>) -> HttpResponse {
    HttpResponse::Ok().json(info.as_ref().clone())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let store = DatasetStore::from_csv(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;
    info!("loaded {} student records", store.len());

    let model = ForestModel::load(&args.model)
        .with_context(|| format!("loading classifier from {}", args.model.display()))?;
    info!(
        "loaded classifier: {} trees, {} features, accuracy {:.2}%",
        model.n_trees(),
        model.n_features(),
        model.accuracy * 100.0
    );

    let recommendations = RecommendationMap::load(&args.map)
        .with_context(|| format!("loading recommendation map from {}", args.map.display()))?;
    info!("loaded {} recommendation labels", recommendations.len());

    let info = ModelInfo::from_model(&model);
    let ctx = web::Data::new(AdvisorContext::new(store, Box::new(model), recommendations));
    let info_data = web::Data::new(info);

    info!("starting Learning Advisor API on http://{}:{}", args.host, args.port);
    HttpServer::new(move || {
        App::new()
            .app_data(ctx.clone())
            .app_data(info_data.clone())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(health_check))
            .route("/health", web::get().to(health_check))
            .route("/students", web::get().to(list_students))
            .route("/recommend", web::post().to(recommend))
            .route("/chat", web::post().to(chat))
            .route("/analytics", web::get().to(analytics))
            .route("/model/info", web::get().to(model_info))
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await?;

    Ok(())
}
