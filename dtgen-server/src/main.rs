use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use dtgen_core::GenerationError;
use dtgen_core::model::{
	DataType, Names, NameRegistry, NamesOptions, WeightedList, WeightedListOptions, EXAMPLES,
};

/// Command line configuration of the server.
#[derive(Parser, Debug, Clone)]
#[command(name = "dtgen-server", about = "Generation endpoints for the WeightedList and Names data types")]
struct Args {
	/// Address to bind.
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind.
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Directory holding country name banks (`<code>.json`).
	#[arg(long, default_value = "./data/names")]
	data_dir: PathBuf,

	/// Number of HTTP workers. Defaults to the number of CPUs.
	#[arg(long)]
	workers: Option<usize>,
}

/// Body of the `generate` endpoints: one row request.
///
/// `seed` makes the row reproducible; without it the thread RNG is used.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<T> {
	row_state: T,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct CountryQuery {
	names: Option<String>,
}

struct SharedData {
	names: Names,
	data_dir: PathBuf,
}

/// Generates one row, with a fresh random source per request.
fn generate_row<D: DataType>(data_type: &D, options: &D::Options, seed: Option<u64>) -> HttpResponse {
	let result = match seed {
		Some(seed) => data_type.generate(options, &mut StdRng::seed_from_u64(seed)),
		None => data_type.generate(options, &mut rand::rng()),
	};

	match result {
		Ok(row) => HttpResponse::Ok().json(row),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP POST endpoint `/v1/weighted_list/generate`
///
/// Draws a weighted subset of `rowState.values` and returns `{ display }`.
#[post("/v1/weighted_list/generate")]
async fn post_weighted_list(request: web::Json<GenerateRequest<WeightedListOptions>>) -> impl Responder {
	generate_row(&WeightedList, &request.row_state, request.seed)
}

#[get("/v1/weighted_list/metadata")]
async fn get_weighted_list_metadata() -> impl Responder {
	HttpResponse::Ok().json(WeightedList.metadata())
}

/// HTTP POST endpoint `/v1/names/generate`
///
/// Expands one of `rowState.options` and returns `{ display }`.
#[post("/v1/names/generate")]
async fn post_names(data: web::Data<RwLock<SharedData>>, request: web::Json<GenerateRequest<NamesOptions>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};
	generate_row(&shared_data.names, &request.row_state, request.seed)
}

#[get("/v1/names/metadata")]
async fn get_names_metadata(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	match data.read() {
		Ok(d) => HttpResponse::Ok().json(d.names.metadata()),
		Err(_) => HttpResponse::InternalServerError().body("Registry lock failed"),
	}
}

#[get("/v1/names/initial_state")]
async fn get_names_initial_state() -> impl Responder {
	HttpResponse::Ok().json(NamesOptions::default())
}

#[get("/v1/names/examples")]
async fn get_names_examples() -> impl Responder {
	HttpResponse::Ok().json(EXAMPLES)
}

#[get("/v1/countries")]
async fn get_countries(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	match data.read() {
		Ok(d) => HttpResponse::Ok().json(d.names.registry().country_codes()),
		Err(_) => HttpResponse::InternalServerError().body("Registry lock failed"),
	}
}

/// HTTP PUT endpoint `/v1/load_countries?names=fr,jp`
///
/// Replaces the loaded country banks with the listed ones.
#[put("/v1/load_countries")]
async fn put_countries(data: web::Data<RwLock<SharedData>>, query: web::Query<CountryQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty country name"),
	};

	let codes: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};

	match NameRegistry::load(&shared_data.data_dir, &codes) {
		Ok(registry) => {
			info!("Loaded country name banks: {:?}", registry.country_codes());
			shared_data.names = Names::new(registry);
			HttpResponse::Ok().body("Countries loaded successfully")
		}
		Err(e @ GenerationError::UnknownCountry(_)) => HttpResponse::NotFound().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to load countries: {e}")),
	}
}

/// Malformed bodies (bad weights, non-numeric bounds) answer 400 with the reason.
fn json_config() -> web::JsonConfig {
	web::JsonConfig::default().error_handler(|err, _req| {
		let message = err.to_string();
		InternalError::from_response(err, HttpResponse::BadRequest().body(message)).into()
	})
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.app_data(json_config())
		.service(post_weighted_list)
		.service(get_weighted_list_metadata)
		.service(post_names)
		.service(get_names_metadata)
		.service(get_names_initial_state)
		.service(get_names_examples)
		.service(get_countries)
		.service(put_countries);
}

/// Main entry point for the server.
///
/// Loads the country name banks found in `--data-dir` (falling back to the
/// built-in western names), then serves the generation endpoints.
/// Log level is controlled by `RUST_LOG` (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let registry = match NameRegistry::load_dir(&args.data_dir) {
		Ok(registry) => registry,
		Err(e) => {
			warn!("No country name banks loaded ({}), using western names only", e);
			NameRegistry::default()
		}
	};
	info!("Country name banks: {:?}", registry.country_codes());

	let shared_data = web::Data::new(RwLock::new(SharedData {
		names: Names::new(registry),
		data_dir: args.data_dir.clone(),
	}));

	info!("Listening on {}:{}", args.host, args.port);
	let mut server = HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(routes)
	});
	if let Some(workers) = args.workers {
		server = server.workers(workers);
	}

	server
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
