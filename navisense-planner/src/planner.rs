//! Planner session: owns the wizard, the trip form, the itinerary store and
//! the derived report, and routes every user action through `dispatch`.
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use thiserror::Error;

use crate::action::{Action, Outcome};
use crate::budget::BudgetBreakdown;
use crate::catalog::{ActivityCatalog, MockCatalog, mock_itinerary};
use crate::config::PlannerConfig;
use crate::form::{TripForm, non_blank};
use crate::itinerary::{ItineraryStore, days_from_response};
use crate::loader::LoaderProgress;
use crate::request::{PlanRequest, build_request};
use crate::response::PlanResponse;
use crate::substitution::{ModifyFlow, substitute};
use crate::transport::PlanError;
use crate::views::{
    Chip, ChipInputs, ItineraryHeader, SeasonCard, SummaryCounts, TipsPool, WeatherCard,
    context_chips, duration_label, itinerary_header, season_card, summary_counts, weather_card,
};
use crate::wizard::{ValidationError, WizardState};

#[cfg(feature = "async")]
use crate::transport::PlanTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Error,
    Info,
}

/// Transient message for the toast area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: format!("⚠️ {message}"),
        }
    }

    #[must_use]
    pub fn info(message: &str) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Service,
    Offline,
}

/// Everything rendered around the itinerary for one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub request: PlanRequest,
    pub source: PlanSource,
    pub header: ItineraryHeader,
    pub chips: Vec<Chip>,
    pub budget: BudgetBreakdown,
    pub season: Option<SeasonCard>,
    pub weather: Option<WeatherCard>,
    pub tips: Vec<String>,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// A newer generation (or a reset) started after this one.
    #[error("generation {ticket} was superseded by {current}")]
    Superseded { ticket: u64, current: u64 },
}

/// A request that has been issued but not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlan {
    pub ticket: u64,
    pub request: PlanRequest,
    pub regenerating: bool,
}

type SharedCatalog = Box<dyn ActivityCatalog + Send + Sync>;

pub struct Planner {
    wizard: WizardState,
    form: TripForm,
    store: ItineraryStore,
    modify: ModifyFlow,
    loader: LoaderProgress,
    report: Option<PlanReport>,
    notice: Option<Notice>,
    config: PlannerConfig,
    catalog: SharedCatalog,
    rng: ChaCha20Rng,
    today: NaiveDate,
    generation: u64,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("wizard", &self.wizard)
            .field("form", &self.form)
            .field("store", &self.store)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Planner {
    /// New session anchored at `today` with a seeded RNG.
    #[must_use]
    pub fn new(today: NaiveDate, seed: u64) -> Self {
        Self {
            wizard: WizardState::new(),
            form: TripForm::new(),
            store: ItineraryStore::new(),
            modify: ModifyFlow::default(),
            loader: LoaderProgress::new(),
            report: None,
            notice: None,
            config: PlannerConfig::load_from_static(),
            catalog: Box::new(MockCatalog::load_from_static()),
            rng: ChaCha20Rng::seed_from_u64(seed),
            today,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: SharedCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub const fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    #[must_use]
    pub const fn form(&self) -> &TripForm {
        &self.form
    }

    #[must_use]
    pub const fn store(&self) -> &ItineraryStore {
        &self.store
    }

    #[must_use]
    pub const fn modify(&self) -> &ModifyFlow {
        &self.modify
    }

    #[must_use]
    pub const fn loader(&self) -> &LoaderProgress {
        &self.loader
    }

    #[must_use]
    pub const fn report(&self) -> Option<&PlanReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.form.end_date(self.wizard.nights())
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        duration_label(self.wizard.nights())
    }

    #[must_use]
    pub fn summary(&self) -> SummaryCounts {
        let nights = self
            .report
            .as_ref()
            .map_or_else(|| self.wizard.nights(), |r| r.request.nights);
        summary_counts(nights, &self.store)
    }

    /// Request for the current selections.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] across all steps.
    pub fn build_request(&self) -> Result<PlanRequest, ValidationError> {
        build_request(&self.wizard, &self.form, self.today)
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::AdvanceStep => match self.wizard.advance(&self.form, self.today) {
                Ok(step) => Outcome::StepChanged(step),
                Err(err) => {
                    log::debug!("advance blocked on {:?}: {err}", err.target());
                    Outcome::Blocked(err)
                }
            },
            Action::RetreatStep => Outcome::StepChanged(self.wizard.retreat()),
            Action::SelectBudget(tier) => {
                self.wizard.select_budget(tier);
                Outcome::Updated
            }
            Action::TogglePurpose(purpose) => {
                if purpose.trim().is_empty() {
                    return Outcome::Ignored;
                }
                self.wizard.toggle_purpose(&purpose);
                Outcome::Updated
            }
            Action::SelectPace(pace) => {
                self.wizard.select_pace(pace);
                Outcome::Updated
            }
            Action::AddCheckpoint(name) => updated_if(self.wizard.add_checkpoint(&name)),
            Action::RemoveCheckpoint(name) => updated_if(self.wizard.remove_checkpoint(&name)),
            Action::SetNights(nights) => {
                self.wizard.set_nights(nights);
                Outcome::Updated
            }
            Action::SetOrigin(origin) => {
                self.form.origin = origin;
                Outcome::Updated
            }
            Action::SetDestination(destination) => {
                self.form.destination = destination;
                Outcome::Updated
            }
            Action::SetStartDate(date) => {
                self.form.start_date = date;
                Outcome::Updated
            }
            Action::SetEndDate(end) => match self.form.nights_until(end) {
                Some(nights) => {
                    self.wizard.set_nights(nights);
                    Outcome::Updated
                }
                None => Outcome::Ignored,
            },
            Action::SetAccommodation(value) => {
                self.form.accommodation = non_blank(value.as_deref());
                Outcome::Updated
            }
            Action::SetGroupSize(group) => {
                self.form.group_size = group;
                Outcome::Updated
            }
            Action::SetSpecialNeeds(value) => {
                self.form.special_needs = non_blank(value.as_deref());
                Outcome::Updated
            }
            Action::SetTotalBudget(amount) => {
                self.form.total_budget = amount;
                Outcome::Updated
            }
            Action::SetCurrency(code) => {
                self.form.currency = non_blank(code.as_deref());
                Outcome::Updated
            }
            Action::OpenModify { day, activity } => {
                match self.modify.open(&self.store, day, activity) {
                    Ok(_) => Outcome::ModifyOpened { day, activity },
                    Err(err) => {
                        log::debug!("modify ignored: {err}");
                        Outcome::Ignored
                    }
                }
            }
            Action::SelectAlternative(alternative) => {
                let context = self.modify.context();
                match self.modify.select(&mut self.store, alternative) {
                    Ok(_) => context.map_or(Outcome::Updated, |ctx| Outcome::Substituted {
                        day: ctx.day,
                        activity: ctx.activity,
                    }),
                    Err(err) => {
                        log::debug!("substitution ignored: {err}");
                        Outcome::Ignored
                    }
                }
            }
            Action::CloseModify => {
                self.modify.close();
                Outcome::Updated
            }
            Action::SubstituteActivity {
                day,
                activity,
                alternative,
            } => match substitute(&mut self.store, day, activity, alternative) {
                Ok(_) => Outcome::Substituted { day, activity },
                Err(err) => {
                    log::debug!("substitution ignored: {err}");
                    Outcome::Ignored
                }
            },
            Action::ToggleDay(day) => self
                .store
                .toggle_day(day)
                .map_or(Outcome::Ignored, |expanded| Outcome::DayToggled { day, expanded }),
            Action::SetViewMode(mode) => {
                self.store.set_view_mode(mode);
                Outcome::Updated
            }
            Action::DismissNotice => updated_if(self.notice.take().is_some()),
            Action::Reset => {
                self.reset();
                Outcome::StepChanged(self.wizard.current_step())
            }
        }
    }

    /// Back to a fresh session in place. Any in-flight generation is dropped.
    pub fn reset(&mut self) {
        self.wizard.reset();
        self.form.clear();
        self.store.clear();
        self.modify.close();
        self.loader.reset();
        self.report = None;
        self.notice = None;
        self.generation += 1;
        log::info!("planner reset (generation {})", self.generation);
    }

    /// Validate, assemble the request and issue a generation ticket.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; no ticket is issued.
    pub fn begin_generation(&mut self, regenerating: bool) -> Result<PendingPlan, ValidationError> {
        let request = self.build_request()?;
        self.generation += 1;
        self.notice = None;
        self.loader.show();
        Ok(PendingPlan {
            ticket: self.generation,
            request,
            regenerating,
        })
    }

    /// Resolve a pending generation with the service reply.
    ///
    /// The loader is dismissed on every path. Failures become a notice;
    /// a superseded ticket changes nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Superseded`] for an outdated ticket and
    /// [`GenerateError::Plan`] for a failed reply.
    pub fn complete_generation(
        &mut self,
        pending: PendingPlan,
        reply: Result<PlanResponse, PlanError>,
    ) -> Result<usize, GenerateError> {
        if pending.ticket != self.generation {
            log::debug!(
                "dropping reply for generation {} (current {})",
                pending.ticket,
                self.generation
            );
            return Err(GenerateError::Superseded {
                ticket: pending.ticket,
                current: self.generation,
            });
        }
        self.loader.dismiss();
        match reply {
            Ok(response) => {
                let count = self.render(pending.request, &response, PlanSource::Service);
                log::info!("itinerary generated with {count} activities");
                Ok(count)
            }
            Err(err) => {
                log::warn!("itinerary generation failed: {err}");
                self.notice = Some(Notice::error(&err.notice(pending.regenerating)));
                Err(GenerateError::Plan(err))
            }
        }
    }

    /// Build an itinerary from the activity catalog without the service.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`].
    pub fn generate_offline(&mut self) -> Result<usize, ValidationError> {
        let request = self.build_request()?;
        self.generation += 1;
        let days = mock_itinerary(
            self.catalog.as_ref(),
            &mut self.rng,
            &request.destination,
            request.nights,
        );
        let count = self.render_days(request, days, &PlanResponse::default(), PlanSource::Offline);
        log::info!("offline itinerary built with {count} activities");
        Ok(count)
    }

    /// Run the loader and the service call together and render the result.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_generation`] and [`Self::complete_generation`].
    #[cfg(feature = "async")]
    pub async fn generate(&mut self, transport: &dyn PlanTransport) -> Result<usize, GenerateError> {
        self.run(transport, false).await
    }

    /// Same as [`Self::generate`], with regeneration wording on failure.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    #[cfg(feature = "async")]
    pub async fn regenerate(&mut self, transport: &dyn PlanTransport) -> Result<usize, GenerateError> {
        self.run(transport, true).await
    }

    #[cfg(feature = "async")]
    async fn run(
        &mut self,
        transport: &dyn PlanTransport,
        regenerating: bool,
    ) -> Result<usize, GenerateError> {
        let pending = self.begin_generation(regenerating)?;
        let delays = self.config.loader.step_delays(&mut self.rng);
        let settle = self.config.loader.settle();
        let ((), reply) = tokio::join!(
            crate::loader::play(&mut self.loader, &delays, settle),
            transport.generate(&pending.request)
        );
        self.complete_generation(pending, reply)
    }

    fn render(&mut self, request: PlanRequest, response: &PlanResponse, source: PlanSource) -> usize {
        let days = days_from_response(response, &request.destination);
        self.render_days(request, days, response, source)
    }

    fn render_days(
        &mut self,
        request: PlanRequest,
        days: Vec<crate::itinerary::Day>,
        response: &PlanResponse,
        source: PlanSource,
    ) -> usize {
        self.modify.close();
        let count = self.store.set_itinerary(days);
        let destination = response
            .destination
            .as_deref()
            .and_then(|d| non_blank(Some(d)))
            .unwrap_or_else(|| request.destination.clone());

        let header = itinerary_header(
            &request.origin,
            &destination,
            Some(request.start_date),
            request.nights,
        );
        let chips = context_chips(&ChipInputs {
            start_date: Some(request.start_date),
            budget: self.wizard.selected_budget,
            purposes: &request.purposes,
            pace: self.wizard.selected_pace,
            nights: request.nights,
        });
        let budget = BudgetBreakdown::resolve(
            response.budget_summary.as_ref(),
            Some(request.budget),
            request.nights,
            Some(request.group_size),
        );
        let tips = TipsPool::shared().select(&response.tips, &mut self.rng);

        self.report = Some(PlanReport {
            source,
            header,
            chips,
            budget,
            season: season_card(Some(request.start_date)),
            weather: weather_card(response.weather.as_ref()),
            tips,
            cached: response.cached,
            request,
        });
        count
    }
}

const fn updated_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Updated
    } else {
        Outcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::ViewMode;
    use crate::wizard::{BudgetTier, Pace};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn filled() -> Planner {
        let mut planner = Planner::new(today(), 7);
        for action in [
            Action::SetOrigin("Pune".to_string()),
            Action::SetDestination("Udaipur".to_string()),
            Action::AdvanceStep,
            Action::SetStartDate(NaiveDate::from_ymd_opt(2026, 11, 2)),
            Action::SetNights(2),
            Action::AdvanceStep,
            Action::SelectBudget(BudgetTier::Premium),
            Action::AdvanceStep,
            Action::TogglePurpose("culture".to_string()),
            Action::SelectPace(Pace::Slow),
        ] {
            assert!(planner.dispatch(action).changed());
        }
        planner
    }

    #[test]
    fn blocked_advance_keeps_step() {
        let mut planner = Planner::new(today(), 1);
        assert_eq!(
            planner.dispatch(Action::AdvanceStep),
            Outcome::Blocked(ValidationError::MissingOrigin)
        );
        assert_eq!(planner.wizard().current_step(), 1);
        assert_eq!(planner.dispatch(Action::RetreatStep), Outcome::StepChanged(1));
    }

    #[test]
    fn end_date_drives_nights() {
        let mut planner = Planner::new(today(), 1);
        let start = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        planner.dispatch(Action::SetStartDate(Some(start)));
        assert_eq!(planner.end_date(), NaiveDate::from_ymd_opt(2026, 12, 6));
        assert_eq!(
            planner.dispatch(Action::SetEndDate(NaiveDate::from_ymd_opt(2026, 12, 9).unwrap())),
            Outcome::Updated
        );
        assert_eq!(planner.wizard().nights(), 8);
        assert_eq!(planner.duration_label(), "9 Days / 8 Nights");
        assert_eq!(planner.dispatch(Action::SetEndDate(start)), Outcome::Ignored);
    }

    #[test]
    fn offline_generation_renders_report() {
        let mut planner = filled();
        let count = planner.generate_offline().unwrap();
        assert_eq!(count, 12);
        let report = planner.report().unwrap();
        assert_eq!(report.source, PlanSource::Offline);
        assert_eq!(report.header.title, "Your Udaipur Itinerary");
        assert_eq!(report.budget.total, 68_000);
        assert_eq!(report.tips.len(), 4);
        assert_eq!(planner.summary().days, 3);
        assert!(planner.store().is_expanded(0));
    }

    #[test]
    fn modify_flow_through_dispatch() {
        let mut planner = filled();
        planner.generate_offline().unwrap();
        assert_eq!(
            planner.dispatch(Action::OpenModify { day: 9, activity: 0 }),
            Outcome::Ignored
        );
        let original = planner.store().activity(1, 2).unwrap().title.clone();
        assert_eq!(
            planner.dispatch(Action::OpenModify { day: 1, activity: 2 }),
            Outcome::ModifyOpened { day: 1, activity: 2 }
        );
        assert_eq!(
            planner.dispatch(Action::SelectAlternative(0)),
            Outcome::Substituted { day: 1, activity: 2 }
        );
        let alternatives = &planner.store().activity(1, 2).unwrap().alternatives;
        assert_eq!(alternatives.last().unwrap().title, original);
        assert_eq!(planner.dispatch(Action::SelectAlternative(0)), Outcome::Ignored);
        assert_eq!(
            planner.dispatch(Action::SubstituteActivity {
                day: 0,
                activity: 0,
                alternative: 99
            }),
            Outcome::Ignored
        );
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut planner = filled();
        let first = planner.begin_generation(false).unwrap();
        let second = planner.begin_generation(true).unwrap();
        assert!(matches!(
            planner.complete_generation(first, Ok(PlanResponse::default())),
            Err(GenerateError::Superseded { ticket: 1, current: 2 })
        ));
        assert!(planner.report().is_none());
        assert!(planner.loader().is_visible());
        let err = planner
            .complete_generation(second, Err(PlanError::status(500)))
            .unwrap_err();
        assert_eq!(err, GenerateError::Plan(PlanError::status(500)));
        assert!(!planner.loader().is_visible());
        assert_eq!(
            planner.notice().unwrap().text,
            "⚠️ Regeneration failed. Please try again."
        );
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut planner = filled();
        planner.dispatch(Action::AddCheckpoint("Chittorgarh".to_string()));
        planner.generate_offline().unwrap();
        planner.dispatch(Action::SetViewMode(ViewMode::Compact));
        assert_eq!(planner.dispatch(Action::Reset), Outcome::StepChanged(1));
        assert_eq!(planner.wizard(), &WizardState::new());
        assert_eq!(planner.form(), &TripForm::new());
        assert!(planner.store().is_empty());
        assert_eq!(planner.store().view_mode(), ViewMode::Timeline);
        assert!(planner.report().is_none());
        assert!(!planner.loader().is_visible());
    }
}
