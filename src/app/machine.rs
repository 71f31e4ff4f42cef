//! Widget state machine
//!
//! `Idle|Result --generate--> Spinning --(spin timer)--> Result`, plus the
//! orthogonal confetti, delete-confirm and toast flags. User actions are
//! methods; timers come back through `on_timer`.

use crate::error::{RenderError, SaveRejection};
use crate::persistence::{CookieJar, SavedSets, SetStore};
use crate::renderer::{TicketLayout, render_ticket, ticket_filename};
use crate::sampler::Sampler;
use crate::settings::Settings;

use super::host::Host;
use super::state::{Phase, Toast, ViewState, confetti_burst};
use super::strings;
use super::timers::{ManualScheduler, Scheduler, TimerHandle, TimerKind};
use super::view::ViewModel;

/// The lottery widget
pub struct LottoApp<J, T, H> {
    settings: Settings,
    layout: TicketLayout,
    store: SetStore<J>,
    scheduler: T,
    host: H,
    sampler: Sampler,
    saved: SavedSets,
    state: ViewState,
}

impl<J: CookieJar, T: Scheduler, H: Host> LottoApp<J, T, H> {
    /// Start idle, with saved sets loaded from the jar
    pub fn new(settings: Settings, jar: J, scheduler: T, host: H, sampler: Sampler) -> Self {
        let store = SetStore::new(jar, settings.cookie.clone());
        let saved = store.load();
        Self {
            settings,
            layout: TicketLayout::default(),
            store,
            scheduler,
            host,
            sampler,
            saved,
            state: ViewState::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn saved(&self) -> &SavedSets {
        &self.saved
    }

    pub fn store(&self) -> &SetStore<J> {
        &self.store
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Presentation snapshot of the current state
    pub fn view(&self) -> ViewModel {
        ViewModel::build(&self.state, &self.saved, self.settings.cookie.expiry_days)
    }

    /// Start a spin. Ignored while already spinning.
    pub fn generate(&mut self) -> bool {
        if self.state.phase == Phase::Spinning {
            log::debug!("Generate ignored, already spinning");
            return false;
        }

        let timing = &self.settings.timing;
        self.state.phase = Phase::Spinning;
        self.state.confetti.clear();
        self.state.preview_timer = Some(
            self.scheduler
                .schedule_repeating(TimerKind::PreviewTick, timing.preview_tick_ms),
        );
        self.state.resolve_timer =
            Some(self.scheduler.schedule_once(TimerKind::Resolve, timing.spin_ms));
        true
    }

    /// Timer callback from the scheduler. Stale handles are ignored.
    pub fn on_timer(&mut self, kind: TimerKind, handle: TimerHandle) {
        match kind {
            TimerKind::PreviewTick => {
                if self.state.phase == Phase::Spinning && self.state.preview_timer == Some(handle)
                {
                    self.state.displayed = self.sampler.preview().to_vec();
                }
            }
            TimerKind::Resolve => {
                if self.state.resolve_timer == Some(handle) {
                    self.resolve();
                }
            }
            TimerKind::ToastDismiss => {
                if self.state.toast.as_ref().is_some_and(|t| t.dismiss == handle) {
                    self.state.toast = None;
                }
            }
        }
    }

    fn resolve(&mut self) {
        // Stop the preview first so it cannot overwrite the result
        if let Some(preview) = self.state.preview_timer.take() {
            self.scheduler.cancel(preview);
        }
        self.state.resolve_timer = None;

        let set = self.sampler.sample();
        self.state.displayed = set.numbers().to_vec();
        self.state.result = Some(set);
        self.state.phase = Phase::Result;
        self.state.confetti = confetti_burst(self.sampler.source_mut());
        log::info!("Drew [{}]", set);
    }

    /// Save the displayed set
    pub fn save(&mut self) -> Result<(), SaveRejection> {
        let set = match (self.state.phase, self.state.result) {
            (Phase::Spinning, _) => return Err(SaveRejection::Busy),
            (Phase::Result, Some(set)) => set,
            _ => return Err(SaveRejection::Incomplete),
        };

        if let Err(rejection) = self.saved.push(set) {
            self.show_toast(strings::TOAST_DUPLICATE);
            return Err(rejection);
        }
        self.store.save(&self.saved);
        self.show_toast(strings::TOAST_SAVED);
        Ok(())
    }

    /// Open the delete-all confirmation
    pub fn request_delete_all(&mut self) {
        self.state.delete_confirm = true;
    }

    /// Delete every saved set and expire the cookie
    pub fn confirm_delete_all(&mut self) {
        self.saved.clear();
        self.store.clear();
        self.state.delete_confirm = false;
        self.show_toast(strings::TOAST_DELETED);
    }

    pub fn cancel_delete_all(&mut self) {
        self.state.delete_confirm = false;
    }

    /// Render the saved sets as a ticket and offer it for download.
    ///
    /// Returns the suggested filename on success.
    pub fn download(&mut self) -> Result<String, RenderError> {
        let today = self.host.today();
        let rendered = render_ticket(
            &self.saved,
            today,
            &self.layout,
            self.sampler.source_mut(),
            self.host.surface(),
        );

        let result = rendered.and_then(|image| {
            let filename = ticket_filename(&self.settings.download, today, self.saved.len());
            self.host.offer_download(&image, &filename)?;
            Ok(filename)
        });

        match &result {
            Ok(filename) => {
                log::info!("Ticket downloaded as {}", filename);
                self.show_toast(strings::TOAST_DOWNLOADED);
            }
            Err(RenderError::Empty) => self.show_toast(strings::TOAST_NO_SETS),
            Err(e) => {
                log::error!("Ticket image failed: {}", e);
                self.show_toast(strings::TOAST_IMAGE_FAILED);
            }
        }
        result
    }

    /// Show a toast, replacing any current one and restarting the delay
    pub fn show_toast(&mut self, message: &str) {
        if let Some(old) = self.state.toast.take() {
            self.scheduler.cancel(old.dismiss);
        }
        let dismiss = self
            .scheduler
            .schedule_once(TimerKind::ToastDismiss, self.settings.timing.toast_ms);
        self.state.toast = Some(Toast {
            message: message.to_string(),
            dismiss,
        });
    }
}

impl<J: CookieJar, H: Host> LottoApp<J, ManualScheduler, H> {
    /// Advance virtual time by `ms`, firing every timer that falls due
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some((kind, handle)) = self.scheduler.pop_due(until) {
            self.on_timer(kind, handle);
        }
        self.scheduler.set_now(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::app::host::HeadlessHost;
    use crate::app::state::CONFETTI_COLORS;
    use crate::consts::CONFETTI_COUNT;
    use crate::persistence::MemoryCookies;
    use crate::renderer::{RecordingSurface, ticket};
    use crate::sampler::{NumberSet, RngSource, ScriptedSource, Tier};

    type TestApp = LottoApp<MemoryCookies, ManualScheduler, HeadlessHost>;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 19).unwrap()
    }

    fn app_with(sampler: Sampler, jar: MemoryCookies) -> TestApp {
        LottoApp::new(
            Settings::default(),
            jar,
            ManualScheduler::new(),
            HeadlessHost::new(date()),
            sampler,
        )
    }

    fn app() -> TestApp {
        app_with(Sampler::new(RngSource::seeded(2024)), MemoryCookies::new())
    }

    fn spin(app: &mut TestApp) -> NumberSet {
        assert!(app.generate());
        app.advance(2000);
        app.state().result.unwrap()
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let app = app();
        assert_eq!(app.phase(), Phase::Idle);
        let view = app.view();
        assert!(view.balls.is_empty());
        assert_eq!(view.placeholder, Some(strings::EMPTY_PLACEHOLDER));
        assert_eq!(view.save_button, None);
        assert_eq!(view.saved_caption, None);
        assert!(view.spin_button.enabled);
    }

    #[test]
    fn test_generate_spins_then_resolves() {
        let mut app = app();
        assert!(app.generate());
        assert_eq!(app.phase(), Phase::Spinning);

        let view = app.view();
        assert_eq!(view.spin_button.label, strings::SPIN_BUSY);
        assert!(!view.spin_button.enabled);
        assert_eq!(view.save_button, None);

        // Previews appear on ticks
        app.advance(100);
        let view = app.view();
        assert_eq!(view.balls.len(), 6);
        assert!(view.balls.iter().all(|b| b.spinning));
        assert_eq!(view.save_button, None);

        app.advance(1900);
        assert_eq!(app.phase(), Phase::Result);
        let result = app.state().result.unwrap();
        assert_eq!(app.state().displayed, result.numbers().to_vec());
        assert!(app.state().confetti_visible());
        assert_eq!(app.view().confetti.len(), CONFETTI_COUNT);
        assert!(!app.scheduler().has_pending(TimerKind::PreviewTick));
        assert!(!app.scheduler().has_pending(TimerKind::Resolve));
    }

    #[test]
    fn test_preview_cannot_overwrite_result() {
        let mut app = app();
        app.generate();
        let preview = app.state().preview_timer.unwrap();
        app.advance(2000);
        let shown = app.state().displayed.clone();

        // A tick delivered late by the platform is ignored
        app.on_timer(TimerKind::PreviewTick, preview);
        assert_eq!(app.state().displayed, shown);
        app.advance(1000);
        assert_eq!(app.state().displayed, shown);
    }

    #[test]
    fn test_generate_ignored_while_spinning() {
        let mut app = app();
        assert!(app.generate());
        assert!(!app.generate());
        assert_eq!(app.scheduler().pending(), 2);
    }

    #[test]
    fn test_regenerate_clears_confetti() {
        let mut app = app();
        spin(&mut app);
        assert!(app.state().confetti_visible());
        app.generate();
        assert!(!app.state().confetti_visible());
        assert!(app.view().confetti.is_empty());
    }

    #[test]
    fn test_scripted_draw_resolves_sorted() {
        // Preview ticks consume draws too; script enough for one of each
        let mut draws = vec![5; 6 * 20];
        draws.extend([7, 7, 12, 3, 45, 45, 22, 1]);
        let mut app = app_with(Sampler::new(ScriptedSource::new(draws)), MemoryCookies::new());
        let set = spin(&mut app);
        assert_eq!(set.numbers(), &[1, 3, 7, 12, 22, 45]);
        let tiers: Vec<Tier> = app.view().balls.iter().map(|b| b.tier).collect();
        assert_eq!(tiers, vec![Tier::A, Tier::A, Tier::A, Tier::B, Tier::C, Tier::E]);
    }

    #[test]
    fn test_save_appends_and_persists() {
        let mut app = app();
        let first = spin(&mut app);
        assert_eq!(app.save(), Ok(()));
        assert_eq!(app.saved().as_slice(), &[first]);
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_SAVED));

        let mut second = spin(&mut app);
        while second == first {
            second = spin(&mut app);
        }
        assert_eq!(app.save(), Ok(()));
        assert_eq!(app.saved().as_slice(), &[first, second]);
        assert_eq!(app.store().load(), *app.saved());

        let view = app.view();
        assert_eq!(view.saved_caption.as_deref(), Some("📊 저장된 번호: 2개 세트"));
        assert_eq!(view.saved_rows.len(), 2);
        assert_eq!(view.saved_rows[1].seq, 2);
    }

    #[test]
    fn test_duplicate_save_rejected() {
        let mut app = app();
        spin(&mut app);
        app.save().unwrap();

        let view = app.view();
        assert_eq!(
            view.save_button,
            Some(crate::app::ButtonView {
                label: strings::SAVE_DUPLICATE,
                enabled: false,
            })
        );

        assert_eq!(app.save(), Err(SaveRejection::Duplicate));
        assert_eq!(app.saved().len(), 1);
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_DUPLICATE));
    }

    #[test]
    fn test_save_rejected_without_result() {
        let mut app = app();
        assert_eq!(app.save(), Err(SaveRejection::Incomplete));
        app.generate();
        app.advance(500);
        assert_eq!(app.save(), Err(SaveRejection::Busy));
        assert!(app.saved().is_empty());
        assert_eq!(app.view().toast, None);
    }

    #[test]
    fn test_loads_saved_sets_at_startup() {
        let mut app = app();
        let set = spin(&mut app);
        app.save().unwrap();

        let jar = app.store().jar().clone();
        let reloaded = app_with(Sampler::new(RngSource::seeded(1)), jar);
        assert_eq!(reloaded.saved().as_slice(), &[set]);
        assert_eq!(reloaded.phase(), Phase::Idle);
    }

    #[test]
    fn test_delete_all_flow() {
        let mut app = app();
        spin(&mut app);
        app.save().unwrap();

        app.request_delete_all();
        assert!(app.view().delete_modal);
        app.cancel_delete_all();
        assert!(!app.view().delete_modal);
        assert_eq!(app.saved().len(), 1);

        app.request_delete_all();
        app.confirm_delete_all();
        assert!(!app.view().delete_modal);
        assert!(app.saved().is_empty());
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_DELETED));

        let jar = app.store().jar().clone();
        let reloaded = app_with(Sampler::new(RngSource::seeded(1)), jar);
        assert!(reloaded.saved().is_empty());
    }

    #[test]
    fn test_delete_confirm_is_orthogonal_to_spin() {
        let mut app = app();
        app.generate();
        app.request_delete_all();
        app.advance(2000);
        assert_eq!(app.phase(), Phase::Result);
        assert!(app.view().delete_modal);
    }

    #[test]
    fn test_download_empty_shows_toast() {
        let mut app = app();
        assert_eq!(app.download(), Err(RenderError::Empty));
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_NO_SETS));
        assert!(app.host().downloads.is_empty());
        assert!(!app.host().surface.begun);
    }

    #[test]
    fn test_download_offers_named_ticket() {
        let mut app = app();
        spin(&mut app);
        app.save().unwrap();

        let filename = app.download().unwrap();
        assert_eq!(filename, "로또_20241019_1게임.png");
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_DOWNLOADED));

        let (name, image) = &app.host().downloads[0];
        assert_eq!(name, &filename);
        assert_eq!(image.height, 150 + 140 + 120);
        assert_eq!(app.host().surface.texts_in_font(ticket::LABEL_FONT), vec!["A"]);
        // Download does not change the primary state
        assert_eq!(app.phase(), Phase::Result);
    }

    #[test]
    fn test_download_surface_failure() {
        let mut host = HeadlessHost::new(date());
        host.surface = RecordingSurface::unavailable();
        let mut app = LottoApp::new(
            Settings::default(),
            MemoryCookies::new(),
            ManualScheduler::new(),
            host,
            Sampler::new(RngSource::seeded(9)),
        );
        spin(&mut app);
        app.save().unwrap();

        assert!(matches!(app.download(), Err(RenderError::SurfaceUnavailable(_))));
        assert_eq!(app.view().toast.as_deref(), Some(strings::TOAST_IMAGE_FAILED));
        assert!(app.host().downloads.is_empty());
    }

    #[test]
    fn test_toast_auto_hides() {
        let mut app = app();
        app.show_toast("hello");
        app.advance(2999);
        assert_eq!(app.view().toast.as_deref(), Some("hello"));
        app.advance(1);
        assert_eq!(app.view().toast, None);
    }

    #[test]
    fn test_new_toast_restarts_delay() {
        let mut app = app();
        app.show_toast("first");
        let stale = app.state().toast.as_ref().unwrap().dismiss;
        app.advance(2000);
        app.show_toast("second");

        // The first toast's timer was cancelled and would be ignored anyway
        app.on_timer(TimerKind::ToastDismiss, stale);
        app.advance(1500);
        assert_eq!(app.view().toast.as_deref(), Some("second"));
        app.advance(1500);
        assert_eq!(app.view().toast, None);
    }

    #[test]
    fn test_confetti_palette_in_view() {
        let mut app = app();
        spin(&mut app);
        assert!(
            app.view()
                .confetti
                .iter()
                .all(|p| CONFETTI_COLORS.contains(&p.color_class()))
        );
    }
}
