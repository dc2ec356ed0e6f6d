//! Link registry: creation, resolution and click accounting.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    Click, ClickSource, Link, LinkRequest, LinkStats, find_duplicate_code,
};
use crate::domain::errors::{CreationError, NotFoundError, ResolutionError, StoreError};
use crate::domain::repositories::LinkStore;
use crate::infrastructure::telemetry::{Stack, TelemetryClient};
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::utils::validation::{is_reserved_code, is_well_formed_url};

/// Draws allowed per request before a generated code is given up on.
const MAX_CODE_DRAWS: usize = 10;

const LINKS_CREATED_METRIC: &str = "quicklink_links_created_total";
const RESOLUTIONS_METRIC: &str = "quicklink_resolutions_total";

/// Owns every [`Link`] and enforces the registry invariants.
///
/// Short codes are unique among present records, a batch is created whole or
/// not at all, and a link is written back to the store after each successful
/// mutation. Persistence and telemetry failures are reported as diagnostics
/// and never fail the operation; the in-memory state stays authoritative.
pub struct LinkService {
    links: Vec<Link>,
    store: Arc<dyn LinkStore>,
    telemetry: TelemetryClient,
    generator: Box<dyn CodeGenerator>,
}

impl LinkService {
    /// Creates an empty registry without reading the store.
    pub fn new(store: Arc<dyn LinkStore>, telemetry: TelemetryClient) -> Self {
        Self {
            links: Vec::new(),
            store,
            telemetry,
            generator: Box::new(RandomCodeGenerator),
        }
    }

    /// Creates a registry populated from `store`.
    ///
    /// A store that cannot be read, or whose records share a short code,
    /// yields an empty registry and an error diagnostic.
    pub fn load(store: Arc<dyn LinkStore>, telemetry: TelemetryClient) -> Self {
        let mut service = Self::new(store, telemetry);

        let loaded = service.store.load().and_then(|links| {
            if let Some(code) = links.as_deref().and_then(find_duplicate_code) {
                return Err(StoreError::DuplicateCode(code.to_string()));
            }
            Ok(links)
        });

        match loaded {
            Ok(Some(links)) => {
                service.telemetry.info(
                    Stack::Backend,
                    "repository",
                    format!("Loaded {} URLs", links.len()),
                );
                service.links = links;
            }
            Ok(None) => {
                tracing::debug!("No stored links found, starting empty");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load stored links");
                service.telemetry.error(
                    Stack::Backend,
                    "repository",
                    format!("Failed to load URLs: {e}"),
                );
            }
        }

        service
    }

    /// Replaces the source of generated codes.
    pub fn with_code_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// All records in creation order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.short_code() == code)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Creates one link per request, all or none.
    ///
    /// Requests with a blank URL are skipped. Blank custom codes count as
    /// absent and get a generated code.
    ///
    /// # Errors
    ///
    /// - [`CreationError::EmptyBatch`] if no request has a URL
    /// - [`CreationError::InvalidUrl`] for the first URL that does not parse
    /// - [`CreationError::DuplicateCustomCode`] if two requests ask for the same code
    /// - [`CreationError::ReservedCode`] if a custom code names a server route
    /// - [`CreationError::CodeAlreadyExists`] if a code is already in use, or
    ///   every generated draw collided
    ///
    /// The registry is unchanged whenever an error is returned.
    pub fn create(
        &mut self,
        requests: Vec<LinkRequest>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Link>, CreationError> {
        match self.build_batch(requests, now) {
            Ok(created) => {
                self.links.extend(created.iter().cloned());
                self.persist();

                metrics::counter!(LINKS_CREATED_METRIC).increment(created.len() as u64);
                self.telemetry.info(
                    Stack::Backend,
                    "service",
                    format!("Created {} URLs", created.len()),
                );

                Ok(created)
            }
            Err(e) => {
                self.telemetry.error(
                    Stack::Backend,
                    "service",
                    format!("URL creation failed: {e}"),
                );
                Err(e)
            }
        }
    }

    /// Validates a batch and mints its records without touching the registry.
    fn build_batch(
        &self,
        requests: Vec<LinkRequest>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Link>, CreationError> {
        let requests: Vec<LinkRequest> = requests
            .into_iter()
            .filter(|request| !request.url.trim().is_empty())
            .map(|mut request| {
                request.url = request.url.trim().to_string();
                request.custom_code = request
                    .custom_code
                    .map(|code| code.trim().to_string())
                    .filter(|code| !code.is_empty());
                request
            })
            .collect();

        if requests.is_empty() {
            return Err(CreationError::EmptyBatch);
        }

        if let Some(request) = requests.iter().find(|r| !is_well_formed_url(&r.url)) {
            return Err(CreationError::InvalidUrl(request.url.clone()));
        }

        let existing: HashSet<&str> = self.links.iter().map(Link::short_code).collect();
        let mut claimed: HashSet<String> = HashSet::new();

        for code in requests.iter().filter_map(|r| r.custom_code.as_deref()) {
            if is_reserved_code(code) {
                return Err(CreationError::ReservedCode(code.to_string()));
            }
            if !claimed.insert(code.to_string()) {
                return Err(CreationError::DuplicateCustomCode(code.to_string()));
            }
        }

        if let Some(code) = requests
            .iter()
            .filter_map(|r| r.custom_code.as_deref())
            .find(|code| existing.contains(code))
        {
            return Err(CreationError::CodeAlreadyExists(code.to_string()));
        }

        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            let code = match request.custom_code {
                Some(code) => code,
                None => {
                    let code = self.draw_unused_code(&existing, &claimed)?;
                    claimed.insert(code.clone());
                    code
                }
            };

            created.push(Link::new(
                Uuid::new_v4(),
                request.url,
                code,
                now,
                request.validity_minutes,
            ));
        }

        Ok(created)
    }

    fn draw_unused_code(
        &self,
        existing: &HashSet<&str>,
        claimed: &HashSet<String>,
    ) -> Result<String, CreationError> {
        let mut last = String::new();

        for _ in 0..MAX_CODE_DRAWS {
            let code = self.generator.generate();
            if !existing.contains(code.as_str())
                && !claimed.contains(&code)
                && !is_reserved_code(&code)
            {
                return Ok(code);
            }
            tracing::debug!(code = %code, "Generated code collided, drawing again");
            last = code;
        }

        Err(CreationError::CodeAlreadyExists(last))
    }

    /// Looks up `code` and records a click from `source`.
    ///
    /// Returns the updated record.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::NotFound`] for an unknown code and
    /// [`ResolutionError::Expired`] once `now` is past the expiry instant.
    /// Neither changes the record.
    pub fn resolve(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        source: ClickSource,
    ) -> Result<Link, ResolutionError> {
        let index = self.live_index(code, now)?;

        self.links[index].record_click(Click::new(now, source));
        let link = self.links[index].clone();
        self.persist();

        metrics::counter!(RESOLUTIONS_METRIC, "outcome" => "success").increment(1);
        Ok(link)
    }

    /// Records a click without returning the record.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub fn record_visit(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        source: ClickSource,
    ) -> Result<(), ResolutionError> {
        self.resolve(code, now, source).map(|_| ())
    }

    fn live_index(&self, code: &str, now: DateTime<Utc>) -> Result<usize, ResolutionError> {
        let Some(index) = self.links.iter().position(|l| l.short_code() == code) else {
            metrics::counter!(RESOLUTIONS_METRIC, "outcome" => "not_found").increment(1);
            return Err(ResolutionError::NotFound(code.to_string()));
        };

        if self.links[index].is_expired_at(now) {
            metrics::counter!(RESOLUTIONS_METRIC, "outcome" => "expired").increment(1);
            return Err(ResolutionError::Expired(code.to_string()));
        }

        Ok(index)
    }

    /// Removes the record with `id`, freeing its code.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no record has that id.
    pub fn delete(&mut self, id: Uuid) -> Result<(), NotFoundError> {
        let Some(index) = self.links.iter().position(|l| l.id() == id) else {
            self.telemetry.error(
                Stack::Backend,
                "service",
                format!("Attempted to delete unknown URL {id}"),
            );
            return Err(NotFoundError(id));
        };

        let removed = self.links.remove(index);
        self.persist();

        self.telemetry.info(
            Stack::Backend,
            "service",
            format!("Deleted URL {}", removed.short_code()),
        );
        Ok(())
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        let removed = self.links.len();
        self.links.clear();
        self.persist();

        self.telemetry.info(
            Stack::Backend,
            "service",
            format!("Cleared all URLs ({removed} removed)"),
        );
    }

    /// Counts records by status as of `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> LinkStats {
        self.links
            .iter()
            .fold(LinkStats::default(), |mut stats, link| {
                stats.total += 1;
                if link.is_expired_at(now) {
                    stats.expired += 1;
                } else {
                    stats.active += 1;
                }
                stats.total_clicks += link.click_count();
                stats
            })
    }

    fn persist(&self) {
        let result = if self.links.is_empty() {
            self.store.clear()
        } else {
            self.store.save(&self.links)
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to persist links");
            self.telemetry.error(
                Stack::Backend,
                "repository",
                format!("Failed to save URLs: {e}"),
            );
        }
    }
}
