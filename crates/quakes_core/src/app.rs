//! Top-level composition of store, query, selection and toolbar.
//!
//! # Responsibility
//! - Own all view-facing state for one session.
//! - Route toolbar commands, selection events and lifecycle changes.
//!
//! # Invariants
//! - State is mutated only through `&mut self`; there is no shared state.
//! - The cached summary is re-derived after every store mutation, after a
//!   refresh, and when the host becomes active.
//! - A selection pointing at a deleted quake is cleared, never reported.
//!   `reconcile` runs on every recompute.

use crate::detail::{render_detail, DetailLayout, DetailView};
use crate::feed::{FeedError, QuakeFeed};
use crate::generator::QuakeGenerator;
use crate::model::quake::{Quake, QuakeId};
use crate::repo::quake_repo::{QuakeRepository, RepoError};
use crate::search::query::{QuakeQuery, SortKey, SortOrder};
use crate::selection::{SelectionChange, SelectionCoordinator, SelectionEvent, SelectionState};
use crate::service::quake_service::{BulkInsertReport, QuakeService, QuakeSummary};
use crate::toolbar::command::ToolbarCommand;
use crate::toolbar::provider::{Platform, ToolbarProvider};
use chrono::NaiveDate;
use log::{error, info};
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Repo(RepoError),
    Feed(FeedError),
    FeedNotConfigured,
    CommandUnavailable {
        command: ToolbarCommand,
        platform: Platform,
    },
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Feed(err) => write!(f, "{err}"),
            Self::FeedNotConfigured => write!(f, "no refresh feed is configured"),
            Self::CommandUnavailable { command, platform } => write!(
                f,
                "toolbar command `{command}` is not available on {} hosts",
                platform.as_str()
            ),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Feed(err) => Some(err),
            Self::FeedNotConfigured | Self::CommandUnavailable { .. } => None,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<FeedError> for AppError {
    fn from(value: FeedError) -> Self {
        Self::Feed(value)
    }
}

/// Host lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePhase {
    #[default]
    Active,
    Inactive,
    Background,
}

/// Result of one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub fetched: usize,
    /// Features the feed could not turn into quakes.
    pub skipped: usize,
    pub stored: BulkInsertReport,
}

/// Side effect produced by a toolbar command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Refreshed(RefreshReport),
    /// Deleted quake id, or `None` when nothing was selected.
    Deleted(Option<QuakeId>),
    Sorted {
        key: SortKey,
        order: SortOrder,
    },
    Added(BulkInsertReport),
}

/// One session of the quake browser.
pub struct QuakeApp<R: QuakeRepository> {
    service: QuakeService<R>,
    query: QuakeQuery,
    selection: SelectionCoordinator,
    summary: QuakeSummary,
    toolbar: Box<dyn ToolbarProvider>,
    feed: Option<Box<dyn QuakeFeed>>,
    generator: QuakeGenerator<StdRng>,
    random_batch_size: usize,
    phase: ScenePhase,
}

impl<R: QuakeRepository> QuakeApp<R> {
    /// Builds an app over `repo` and derives the initial summary.
    pub fn new(
        repo: R,
        toolbar: Box<dyn ToolbarProvider>,
        random_batch_size: usize,
    ) -> AppResult<Self> {
        let service = QuakeService::new(repo);
        let summary = service.summary()?;
        Ok(Self {
            service,
            query: QuakeQuery::default(),
            selection: SelectionCoordinator::new(),
            summary,
            toolbar,
            feed: None,
            generator: QuakeGenerator::from_os_rng(),
            random_batch_size,
            phase: ScenePhase::Active,
        })
    }

    pub fn with_feed(mut self, feed: Box<dyn QuakeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_generator(mut self, generator: QuakeGenerator<StdRng>) -> Self {
        self.generator = generator;
        self
    }

    pub fn service(&self) -> &QuakeService<R> {
        &self.service
    }

    pub fn toolbar(&self) -> &dyn ToolbarProvider {
        self.toolbar.as_ref()
    }

    pub fn query(&self) -> &QuakeQuery {
        &self.query
    }

    pub fn summary(&self) -> &QuakeSummary {
        &self.summary
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    /// Quakes visible under the current query, in list order.
    pub fn quakes(&self) -> AppResult<Vec<Quake>> {
        Ok(self.service.list_quakes(&self.query)?)
    }

    pub fn set_query(&mut self, query: QuakeQuery) {
        self.query = query;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.search_text = text.into();
    }

    pub fn set_search_date(&mut self, date: Option<NaiveDate>) {
        self.query.search_date = date;
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.query.sort_key = key;
        self.query.sort_order = order;
    }

    /// Selection event from the list surface.
    pub fn select_from_list(&mut self, id: Option<QuakeId>) -> SelectionChange {
        self.selection.apply(SelectionEvent::List(id))
    }

    /// Selection event from the map surface.
    pub fn select_from_map(&mut self, id: Option<QuakeId>) -> SelectionChange {
        self.selection.apply(SelectionEvent::Map(id))
    }

    /// Renders the detail pane for the primary selection.
    pub fn detail(&self, layout: DetailLayout) -> AppResult<DetailView> {
        let quakes = self.quakes()?;
        Ok(render_detail(&quakes, self.selection.primary(), layout))
    }

    /// Runs one toolbar command offered by the active provider.
    pub fn run_command(&mut self, command: ToolbarCommand) -> AppResult<CommandOutcome> {
        if !self.toolbar.supports(command) {
            return Err(AppError::CommandUnavailable {
                command,
                platform: self.toolbar.platform(),
            });
        }

        match command {
            ToolbarCommand::Refresh => self.refresh().map(CommandOutcome::Refreshed),
            ToolbarCommand::DeleteSelected => self.delete_selected().map(CommandOutcome::Deleted),
            ToolbarCommand::CycleSort => {
                self.query.cycle_sort();
                Ok(CommandOutcome::Sorted {
                    key: self.query.sort_key,
                    order: self.query.sort_order,
                })
            }
            ToolbarCommand::AddRandom => self
                .add_random(self.random_batch_size)
                .map(CommandOutcome::Added),
        }
    }

    /// Fetches from the configured feed into the store, then recomputes.
    ///
    /// Blocks until the feed returns.
    pub fn refresh(&mut self) -> AppResult<RefreshReport> {
        let Some(feed) = self.feed.as_deref() else {
            return Err(AppError::FeedNotConfigured);
        };

        let started_at = Instant::now();
        info!(
            "event=refresh module=app status=start feed={}",
            feed.name()
        );

        let batch = match feed.fetch() {
            Ok(batch) => batch,
            Err(err) => {
                error!(
                    "event=refresh module=app status=error feed={} duration_ms={} error={}",
                    feed.name(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let stored = self.service.ingest(&batch.quakes);
        let report = RefreshReport {
            fetched: batch.quakes.len(),
            skipped: batch.skipped,
            stored,
        };
        info!(
            "event=refresh module=app status=ok feed={} fetched={} skipped={} stored={} failed={} duration_ms={}",
            feed.name(),
            report.fetched,
            report.skipped,
            stored.inserted,
            stored.failed,
            started_at.elapsed().as_millis()
        );

        self.recompute()?;
        Ok(report)
    }

    /// Deletes the primary selection and clears both selection slots.
    ///
    /// A selection whose quake was already removed from the store counts as
    /// no selection.
    pub fn delete_selected(&mut self) -> AppResult<Option<QuakeId>> {
        self.reconcile()?;
        let Some(id) = self.selection.primary().cloned() else {
            return Ok(None);
        };

        self.delete(&id)?;
        Ok(Some(id))
    }

    /// Deletes one quake by id, clearing the selection if it pointed there.
    pub fn delete(&mut self, id: &QuakeId) -> AppResult<()> {
        self.service.delete_quake(id)?;
        if self.selection.primary() == Some(id) || self.selection.secondary() == Some(id) {
            self.selection.clear();
        }
        self.recompute()?;
        Ok(())
    }

    /// Generates `count` quakes into the store, then recomputes.
    pub fn add_random(&mut self, count: usize) -> AppResult<BulkInsertReport> {
        let report = self.service.add_random(count, &mut self.generator);
        self.recompute()?;
        Ok(report)
    }

    /// Re-derives the summary from store contents without fetching, and
    /// drops a selection whose quake is gone.
    pub fn recompute(&mut self) -> AppResult<&QuakeSummary> {
        self.summary = self.service.summary()?;
        self.reconcile()?;
        Ok(&self.summary)
    }

    /// Clears the selection when either slot names a quake missing from the
    /// store.
    pub fn reconcile(&mut self) -> AppResult<SelectionChange> {
        let state = self.selection.state();
        let mut existing = HashSet::new();
        for id in [state.primary.as_ref(), state.secondary.as_ref()]
            .into_iter()
            .flatten()
        {
            if self.service.get_quake(id)?.is_some() {
                existing.insert(id.clone());
            }
        }

        let change = self.selection.prune(&existing);
        if let SelectionChange::Updated { .. } = change {
            info!("event=selection_reconcile module=app status=ok cleared=true");
        }
        Ok(change)
    }

    /// Lifecycle hook; becoming active triggers a local recompute.
    ///
    /// Returns whether a recompute ran.
    pub fn scene_phase_changed(&mut self, phase: ScenePhase) -> AppResult<bool> {
        let previous = self.phase;
        self.phase = phase;

        if phase == ScenePhase::Active && previous != ScenePhase::Active {
            self.recompute()?;
            return Ok(true);
        }
        Ok(false)
    }
}
