use crate::application::{ProgressTracker, SitemapGenerator};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::archive::zip_folder;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::{sanitize_filename, OutputLayout, UploadKind};
use actix_cors::Cors;
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

pub use crate::shared::activity_log::{add_log, add_log_entry, LogEntry};

mod pages;

pub struct HttpState {
    pub layout: OutputLayout,
    pub progress: ProgressTracker,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, MultipartForm)]
pub struct GenerateForm {
    pub homepage_file: Option<TempFile>,
    pub internal_file: Option<TempFile>,
    pub homepage_select: Option<Text<String>>,
    pub internal_select: Option<Text<String>>,
}

#[get("/")]
async fn index(data: web::Data<HttpState>) -> impl Responder {
    let homepage_uploads = data
        .layout
        .list_uploads(UploadKind::Homepage)
        .unwrap_or_default();
    let internal_uploads = data
        .layout
        .list_uploads(UploadKind::Internal)
        .unwrap_or_default();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::index_page(&homepage_uploads, &internal_uploads))
}

#[post("/")]
async fn generate(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<GenerateForm>,
) -> impl Responder {
    let homepage_path = match resolve_upload(
        &data,
        form.homepage_file,
        form.homepage_select,
        UploadKind::Homepage,
    ) {
        Ok(path) => path,
        Err(e) => return reject(&data, &e),
    };
    let internal_path = match resolve_upload(
        &data,
        form.internal_file,
        form.internal_select,
        UploadKind::Internal,
    ) {
        Ok(path) => path,
        Err(e) => return reject(&data, &e),
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Starting sitemap generation ({} / {})",
            homepage_path.display(),
            internal_path.display()
        ),
    );

    let generator = SitemapGenerator::new(
        data.layout.clone(),
        data.progress.clone(),
        data.logs.clone(),
    );

    // File-heavy pipeline goes to a blocking thread so /progress
    // stays responsive while the browser polls it.
    let outcome = web::block(move || {
        generator
            .run(&homepage_path, &internal_path)
            .map_err(|e| {
                generator.log_error(&e);
                e
            })
    })
    .await;

    match outcome {
        Ok(Ok(summary)) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Generated sitemaps: {} regular URLs, {} paginated, {} locales skipped",
                    summary.regular_urls, summary.paginated_urls, summary.skipped_locales
                ),
            );
            see_other("/success")
        }
        Ok(Err(_)) => see_other("/"),
        Err(e) => {
            let message = format!("Generation task failed: {}", e);
            add_log(&data.logs, "ERROR", "HttpApi", &message);
            data.progress.fail(message);
            see_other("/")
        }
    }
}

#[get("/progress")]
async fn get_progress(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.progress.snapshot())
}

#[get("/success")]
async fn success(_data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::success_page())
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

#[get("/download_compressed")]
async fn download_compressed(data: web::Data<HttpState>) -> impl Responder {
    zip_response(&data, data.layout.sitemap_dir(), "xml_sitemaps.zip")
}

#[get("/download_raw")]
async fn download_raw(data: web::Data<HttpState>) -> impl Responder {
    zip_response(&data, data.layout.raw_sitemap_dir(), "raw_xml_sitemaps.zip")
}

#[get("/download_master_compressed")]
async fn download_master_compressed(data: web::Data<HttpState>) -> impl Responder {
    zip_response(&data, data.layout.master_dir(), "master_xml_sitemaps.zip")
}

#[get("/download_master_raw")]
async fn download_master_raw(data: web::Data<HttpState>) -> impl Responder {
    zip_response(
        &data,
        data.layout.master_raw_dir(),
        "master_raw_xml_sitemaps.zip",
    )
}

#[get("/download_paginated_compressed")]
async fn download_paginated_compressed(data: web::Data<HttpState>) -> impl Responder {
    zip_response(
        &data,
        data.layout.paginated_dir(),
        "paginated_xml_sitemaps.zip",
    )
}

#[get("/download_paginated_raw")]
async fn download_paginated_raw(data: web::Data<HttpState>) -> impl Responder {
    zip_response(
        &data,
        data.layout.paginated_raw_dir(),
        "paginated_raw_xml_sitemaps.zip",
    )
}

#[get("/download_csv")]
async fn download_csv(data: web::Data<HttpState>) -> impl Responder {
    report_response(&data, format!("all_urls_{}.csv", today()))
}

#[get("/download_paginated_csv")]
async fn download_paginated_csv(data: web::Data<HttpState>) -> impl Responder {
    report_response(&data, format!("all_paginated_urls_{}.csv", today()))
}

#[get("/download_skipped")]
async fn download_skipped(data: web::Data<HttpState>) -> impl Responder {
    report_response(&data, format!("skipped_locales_{}.csv", today()))
}

/// Store an uploaded file under its date-stamped name, or resolve a
/// previously uploaded one picked from the select box.
fn resolve_upload(
    data: &web::Data<HttpState>,
    file: Option<TempFile>,
    select: Option<Text<String>>,
    kind: UploadKind,
) -> Result<PathBuf> {
    let label = match kind {
        UploadKind::Homepage => "homepage",
        UploadKind::Internal => "internal pages",
    };

    if let Some(file) = file {
        if file.size > 0 {
            let original = file.file_name.as_deref().unwrap_or("upload.csv");
            let stamped = data.layout.stamped_upload_name(original, kind);
            let dest = data.layout.upload_dir().join(&stamped);
            std::fs::copy(file.file.path(), &dest)?;
            info!(file = %stamped, "Stored {} upload", label);
            return Ok(dest);
        }
    }

    if let Some(Text(name)) = select {
        if !name.trim().is_empty() {
            let path = data.layout.upload_dir().join(sanitize_filename(&name));
            if !path.exists() {
                return Err(AppError::NotFound(format!(
                    "Previously uploaded file not found: {}",
                    name
                )));
            }
            return Ok(path);
        }
    }

    Err(AppError::ValidationError(format!(
        "No {} CSV provided: upload a file or pick a previous one",
        label
    )))
}

fn reject(data: &web::Data<HttpState>, err: &AppError) -> HttpResponse {
    let message = err.to_string();
    add_log(&data.logs, "ERROR", "HttpApi", &message);
    data.progress.fail(message);
    see_other("/")
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Zip one output folder in memory and serve it as an attachment.
fn zip_response(data: &web::Data<HttpState>, dir: PathBuf, filename: &str) -> HttpResponse {
    match zip_folder(&dir) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/zip")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(bytes),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Failed to build {}: {}", filename, e),
            );
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

fn report_response(data: &web::Data<HttpState>, filename: String) -> HttpResponse {
    match std::fs::read(data.layout.report_path(&filename)) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(bytes),
        Err(_) => HttpResponse::NotFound().body(format!(
            "{} not found. Run a generation first.",
            filename
        )),
    }
}

fn today() -> String {
    Local::now().format("%Y%m%d").to_string()
}

pub fn start_server(
    config: &AppConfig,
    layout: OutputLayout,
    progress: ProgressTracker,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        layout,
        progress,
        logs,
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(index)
            .service(generate)
            .service(get_progress)
            .service(success)
            .service(get_logs)
            .service(download_compressed)
            .service(download_raw)
            .service(download_master_compressed)
            .service(download_master_raw)
            .service(download_paginated_compressed)
            .service(download_paginated_raw)
            .service(download_csv)
            .service(download_paginated_csv)
            .service(download_skipped)
    })
    .bind(config.bind_addr())?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Progress;
    use actix_web::test;

    fn temp_root(name: &str) -> PathBuf {
        let root =
            std::env::temp_dir().join(format!("sitemapgen_http_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        root
    }

    fn state_for(root: &std::path::Path) -> web::Data<HttpState> {
        let layout = OutputLayout::new(root);
        layout.ensure_all().unwrap();
        web::Data::new(HttpState {
            layout,
            progress: ProgressTracker::new(),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    #[actix_web::test]
    async fn test_index_serves_upload_form() {
        let root = temp_root("index");
        let state = state_for(&root);
        std::fs::write(
            state.layout.upload_dir().join("20250101_old_homepage.csv"),
            b"x",
        )
        .unwrap();

        let app = test::init_service(App::new().app_data(state.clone()).service(index)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.status().is_success());

        let body = test::read_body(res).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("multipart/form-data"));
        assert!(html.contains("20250101_old_homepage.csv"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn test_progress_returns_snapshot() {
        let root = temp_root("progress");
        let state = state_for(&root);
        state.progress.set_phase("Processing en-us", 45);

        let app =
            test::init_service(App::new().app_data(state.clone()).service(get_progress)).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/progress").to_request()).await;
        assert!(res.status().is_success());

        let progress: Progress = test::read_body_json(res).await;
        assert_eq!(progress.status, "Processing en-us");
        assert_eq!(progress.percentage, 45);
        assert!(progress.error.is_none());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn test_missing_report_is_not_found() {
        let root = temp_root("report404");
        let state = state_for(&root);

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(download_paginated_csv),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/download_paginated_csv")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn test_download_compressed_serves_zip() {
        let root = temp_root("zip");
        let state = state_for(&root);
        std::fs::write(
            state.layout.sitemap_dir().join("sitemap_test.xml.gz"),
            b"payload",
        )
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(download_compressed),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/download_compressed")
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        assert_eq!(
            res.headers()
                .get(actix_web::http::header::CONTENT_TYPE)
                .unwrap(),
            "application/zip"
        );

        let body = test::read_body(res).await;
        assert!(body.starts_with(b"PK"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[actix_web::test]
    async fn test_logs_endpoint_returns_entries() {
        let root = temp_root("logs");
        let state = state_for(&root);
        add_log(&state.logs, "INFO", "Test", "hello");

        let app = test::init_service(App::new().app_data(state.clone()).service(get_logs)).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/logs").to_request()).await;
        assert!(res.status().is_success());

        let entries: Vec<LogEntry> = test::read_body_json(res).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "hello");

        let _ = std::fs::remove_dir_all(&root);
    }
}
