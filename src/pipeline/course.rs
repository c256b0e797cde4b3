// src/pipeline/course.rs

//! Per-course pipeline: landing page, subpages, re-parse, materials.

use url::Url;

use crate::error::Result;
use crate::models::{Course, CourseDataBundle, Material, SubpageKind, SubpageUrls};
use crate::parser::{extract_course_urls, parse_files, parse_groups, parse_scores};
use crate::pipeline::policy::{MATERIAL_REFRESH, Payload, Refresh, ResourcePolicy, policy_for};
use crate::storage::{CourseDirs, LocalStorage};
use crate::utils::file_name_from_url;
use crate::utils::http::{Fetcher, SessionCookie};

/// Counters for one course.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CourseStats {
    pub landing_failed: bool,
    pub subpages_fetched: usize,
    pub subpages_cached: usize,
    pub subpage_failures: usize,
    pub materials_downloaded: usize,
    pub materials_cached: usize,
    pub material_failures: usize,
}

/// Result of processing one course.
#[derive(Debug, Default, Clone)]
pub struct CourseOutcome {
    pub bundle: CourseDataBundle,
    pub stats: CourseStats,
}

enum SyncAction {
    Fetched,
    Cached,
}

/// Drives one course from landing page to downloaded materials.
pub struct CoursePipeline<'a> {
    fetcher: &'a dyn Fetcher,
    storage: &'a LocalStorage,
    cookie: &'a SessionCookie,
    base: Url,
}

impl<'a> CoursePipeline<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        storage: &'a LocalStorage,
        cookie: &'a SessionCookie,
        base: Url,
    ) -> Self {
        Self {
            fetcher,
            storage,
            cookie,
            base,
        }
    }

    /// Process one course to completion.
    ///
    /// Subpage and material failures are logged and skipped. A course without
    /// a URL, or whose landing page cannot be fetched and stored, gets an
    /// empty bundle.
    pub async fn process(&self, course: &Course) -> CourseOutcome {
        let dirs = self.storage.course(&course.folder_name());
        let mut outcome = CourseOutcome::default();

        match &course.url {
            Some(url) => match self.fetch_landing(url, &dirs).await {
                Ok(urls) => {
                    self.sync_subpages(&urls, &dirs, &mut outcome.stats).await;
                    outcome.bundle = self.load_bundle(&dirs).await;
                    outcome.bundle.syllabus_url = urls.get(&SubpageKind::SyllabusFile).cloned();
                    self.download_materials(&outcome.bundle.materials, &dirs, &mut outcome.stats)
                        .await;
                }
                Err(e) => {
                    log::warn!("Skipping course '{}': landing page {}: {}", course.name, url, e);
                    outcome.stats.landing_failed = true;
                }
            },
            None => log::debug!("Course '{}' has no URL, nothing to fetch", course.name),
        }

        outcome.bundle.has_local_syllabus = self.storage.exists(&dirs.canonical_syllabus()).await;
        outcome.bundle.folder = Some(dirs.folder);
        outcome
    }

    /// Fetch and store the landing page, returning its subpage URLs.
    async fn fetch_landing(&self, url: &str, dirs: &CourseDirs) -> Result<SubpageUrls> {
        self.storage.ensure_course_dirs(dirs).await?;
        let html = self.fetcher.fetch_text(url, self.cookie.get().as_deref()).await?;
        self.storage.write_text(&dirs.landing_page(), &html).await?;

        let urls = extract_course_urls(&html, &self.base);
        log::debug!("{}: found subpages {:?}", dirs.folder, urls.keys());
        Ok(urls)
    }

    async fn sync_subpages(&self, urls: &SubpageUrls, dirs: &CourseDirs, stats: &mut CourseStats) {
        for (&kind, url) in urls {
            match self.sync_subpage(policy_for(kind), url, dirs).await {
                Ok(SyncAction::Fetched) => stats.subpages_fetched += 1,
                Ok(SyncAction::Cached) => stats.subpages_cached += 1,
                Err(e) => {
                    stats.subpage_failures += 1;
                    log::warn!("{}: {} fetch failed ({}): {}", dirs.folder, kind.tag(), url, e);
                }
            }
        }
    }

    async fn sync_subpage(
        &self,
        policy: ResourcePolicy,
        url: &str,
        dirs: &CourseDirs,
    ) -> Result<SyncAction> {
        if policy.refresh == Refresh::Once && self.storage.exists(&policy.cache_key(dirs)).await {
            return Ok(SyncAction::Cached);
        }

        let cookie = self.cookie.get();
        let bytes = match policy.payload {
            Payload::Text => self
                .fetcher
                .fetch_text(url, cookie.as_deref())
                .await?
                .into_bytes(),
            Payload::Binary => self.fetcher.fetch_bytes(url, cookie.as_deref()).await?,
        };

        for target in policy.targets(dirs) {
            self.storage.write_bytes(&target, &bytes).await?;
        }
        Ok(SyncAction::Fetched)
    }

    /// Re-parse whichever cached subpages exist.
    ///
    /// The scores lector is threaded into the materials filter.
    pub async fn load_bundle(&self, dirs: &CourseDirs) -> CourseDataBundle {
        let mut bundle = CourseDataBundle::default();

        if let Some(html) = self.read_cached(dirs, SubpageKind::Scores).await {
            bundle.scores = Some(parse_scores(&html));
        }
        if let Some(html) = self.read_cached(dirs, SubpageKind::Files).await {
            bundle.materials = parse_files(&html, bundle.lector(), &self.base);
        }
        if let Some(html) = self.read_cached(dirs, SubpageKind::Groups).await {
            bundle.groups = Some(parse_groups(&html));
        }

        bundle
    }

    async fn read_cached(&self, dirs: &CourseDirs, kind: SubpageKind) -> Option<String> {
        let path = dirs.subpage(kind);
        match self.storage.read_text(&path).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Cannot read cached {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn download_materials(
        &self,
        materials: &[Material],
        dirs: &CourseDirs,
        stats: &mut CourseStats,
    ) {
        for url in materials.iter().filter_map(|m| m.url.as_deref()) {
            let target = dirs.material(&file_name_from_url(url));
            if MATERIAL_REFRESH == Refresh::Once && self.storage.exists(&target).await {
                stats.materials_cached += 1;
                continue;
            }

            let result = async {
                let bytes = self.fetcher.fetch_bytes(url, self.cookie.get().as_deref()).await?;
                self.storage.write_bytes(&target, &bytes).await
            }
            .await;

            match result {
                Ok(()) => stats.materials_downloaded += 1,
                Err(e) => {
                    stats.material_failures += 1;
                    log::warn!("Failed to download {}: {}", url, e);
                }
            }
        }
    }
}
