// src/pipeline/run.rs

//! Listing preview and full dashboard generation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Course, CourseDataBundle, CourseListing};
use crate::parser::parse_courses;
use crate::pipeline::course::{CoursePipeline, CourseStats};
use crate::render::render_dashboard;
use crate::storage::LocalStorage;
use crate::utils::http::{Fetcher, SessionCookie};

/// Fetch and parse the main course table only.
pub async fn fetch_listing(
    config: &Config,
    fetcher: &dyn Fetcher,
    cookie: &SessionCookie,
) -> Result<CourseListing> {
    let base = Url::parse(&config.portal.base_url)?;
    let html = fetcher
        .fetch_text(&config.portal.courses_url, cookie.get().as_deref())
        .await?;
    let listing = parse_courses(&html, &base);
    log::info!(
        "Listing: {} courses, total ECTS {}",
        listing.courses.len(),
        listing
            .total_ects
            .as_ref()
            .map_or_else(|| "n/a".to_string(), ToString::to_string)
    );
    Ok(listing)
}

/// Summary of a generation run.
///
/// Only `courses_count` reaches HTTP callers; the rest is for logs.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub courses_count: usize,
    pub landing_failures: usize,
    pub subpage_failures: usize,
    pub materials_downloaded: usize,
    pub materials_cached: usize,
    pub material_failures: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl GenerationReport {
    fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            courses_count: 0,
            landing_failures: 0,
            subpage_failures: 0,
            materials_downloaded: 0,
            materials_cached: 0,
            material_failures: 0,
            start_time,
            end_time: start_time,
        }
    }

    fn record(&mut self, stats: &CourseStats) {
        self.courses_count += 1;
        self.landing_failures += usize::from(stats.landing_failed);
        self.subpage_failures += stats.subpage_failures;
        self.materials_downloaded += stats.materials_downloaded;
        self.materials_cached += stats.materials_cached;
        self.material_failures += stats.material_failures;
    }

    fn log_summary(&self) {
        let elapsed = self.end_time - self.start_time;
        log::info!(
            "Generated dashboard for {} courses in {}s",
            self.courses_count,
            elapsed.num_seconds()
        );
        log::info!(
            "  landing failures: {}, subpage failures: {}",
            self.landing_failures,
            self.subpage_failures
        );
        log::info!(
            "  materials: {} downloaded, {} cached, {} failed",
            self.materials_downloaded,
            self.materials_cached,
            self.material_failures
        );
    }
}

/// Load the dashboard template.
pub async fn load_template(config: &Config) -> Result<String> {
    let path = config.paths.template_path();
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::template(format!("cannot read {}: {e}", path.display())))
}

/// Full run: listing, every course in order, dashboard file.
///
/// Courses are processed strictly one after another. Per-course problems are
/// logged and absorbed; listing, template and dashboard-write failures abort.
pub async fn run_generation(
    config: &Config,
    fetcher: &dyn Fetcher,
    storage: &LocalStorage,
    cookie: &SessionCookie,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::new(Utc::now());
    let template = load_template(config).await?;
    let listing = fetch_listing(config, fetcher, cookie).await?;

    let base = Url::parse(&config.portal.base_url)?;
    let pipeline = CoursePipeline::new(fetcher, storage, cookie, base);

    let total = listing.courses.len();
    let mut entries: Vec<(Course, CourseDataBundle)> = Vec::with_capacity(total);
    for (idx, course) in listing.courses.into_iter().enumerate() {
        log::info!("[{}/{}] {}", idx + 1, total, course.name);
        let outcome = pipeline.process(&course).await;
        report.record(&outcome.stats);
        entries.push((course, outcome.bundle));
    }

    let html = render_dashboard(&template, &entries);
    storage.write_text(&config.paths.index_html, &html).await?;

    report.end_time = Utc::now();
    report.log_summary();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::pipeline::course::tests::{BASE, COURSE_URL, FakeFetcher, portal};

    const LISTING: &str = r#"<html><body>
        <table class="table table-striped table-bordered table-hover fluid"><tbody>
          <tr><td>1</td><td>CS1</td><td><a href="/en/student/me/course/index/7">Programming: I</a></td><td>55</td><td></td><td>5</td></tr>
          <tr><td>2</td><td>X</td><td>Unlinked</td><td>n/a</td><td></td><td>3</td></tr>
          <tr><td></td><td>8</td></tr>
        </tbody></table></body></html>"#;

    const TEMPLATE: &str = "<html><main>{{SUMMARY}}</main><section>{{COURSES}}</section></html>";

    fn config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.portal.base_url = BASE.to_string();
        config.portal.courses_url = BASE.to_string();
        config.paths.html_dir = tmp.path().join("html");
        config.paths.courses_dir = tmp.path().join("courses");
        config.paths.templates_dir = tmp.path().join("templates");
        config.paths.index_html = tmp.path().join("index.html");
        config
    }

    #[tokio::test]
    async fn listing_parses_main_table() {
        let tmp = TempDir::new().unwrap();
        let fetcher = FakeFetcher::default().with(BASE, LISTING);
        let cookie = SessionCookie::new(Some("sid=9".into()));

        let listing = fetch_listing(&config(&tmp), &fetcher, &cookie).await.unwrap();

        assert_eq!(listing.courses.len(), 2);
        assert_eq!(listing.courses[0].url.as_deref(), Some(COURSE_URL));
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generation_writes_dashboard() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        std::fs::create_dir_all(&config.paths.templates_dir).unwrap();
        std::fs::write(config.paths.template_path(), TEMPLATE).unwrap();

        let fetcher = portal().with(BASE, LISTING);
        let storage = LocalStorage::from_config(&config.paths);
        let cookie = SessionCookie::default();

        let report = run_generation(&config, &fetcher, &storage, &cookie)
            .await
            .unwrap();

        assert_eq!(report.courses_count, 2);
        assert_eq!(report.landing_failures, 0);
        assert_eq!(report.materials_downloaded, 2);

        let html = std::fs::read_to_string(&config.paths.index_html).unwrap();
        assert!(html.starts_with("<html><main><div class=\"summary\">"));
        assert!(html.contains("Programming: I"));
        assert!(html.contains("Unlinked"));
        assert!(!html.contains("{{COURSES}}"));
        assert!(!html.contains("{{SUMMARY}}"));
    }

    #[tokio::test]
    async fn missing_template_fails_before_fetching() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let fetcher = portal().with(BASE, LISTING);
        let storage = LocalStorage::from_config(&config.paths);

        let err = run_generation(&config, &fetcher, &storage, &SessionCookie::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Template(_)));
        assert!(fetcher.calls.lock().unwrap().is_empty());
        assert!(!config.paths.index_html.exists());
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        std::fs::create_dir_all(&config.paths.templates_dir).unwrap();
        std::fs::write(config.paths.template_path(), TEMPLATE).unwrap();

        let err = run_generation(
            &config,
            &FakeFetcher::default(),
            &LocalStorage::from_config(&config.paths),
            &SessionCookie::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(404));
    }
}
