//! Presentation driver.
//!
//! [`PresentationDriver`] decides whether and what to render in response to host events. Every
//! trigger re-runs the full decide-and-render step; there is no incremental diffing and no state
//! beyond the enabled flag, the panel attachment and the refresh timer.
//!
//! # Example
//!
//! ```rust
//! use diag_lens::{Diagnostic, DiagnosticStore, DocumentUri, PanelView, PresentationDriver, VisualTier};
//!
//! let uri = DocumentUri::parse("file:///src/main.rs");
//! let mut store = DiagnosticStore::new();
//! store.open(uri.clone());
//!
//! let mut shown = Vec::<PanelView>::new();
//! {
//!     let mut driver = PresentationDriver::new(&store, |view: &PanelView| shown.push(*view));
//!     driver.attach_panel();
//!     driver.on_tick();
//! }
//! assert_eq!(shown.len(), 2);
//! assert_eq!(shown[1].error_tier, VisualTier::Resting);
//!
//! store.publish(uri.clone(), vec![Diagnostic::error(3, "mismatched types")]);
//! let driver = PresentationDriver::new(&store, |_: &PanelView| {});
//! assert_eq!(driver.current_view().error_label(), "1 errors");
//! ```

use crate::aggregate::aggregate;
use crate::error::LensError;
use crate::host::{LensEvent, LensHost, PanelRenderer};
use crate::options::LensOptions;
use crate::timer::RefreshTimer;
use crate::uri::DocumentUri;
use crate::view::PanelView;
use std::sync::mpsc::Sender;

/// Drives a lens panel from host events.
pub struct PresentationDriver<H, R> {
    host: H,
    renderer: R,
    options: LensOptions,
    enabled: bool,
    panel_attached: bool,
    render_count: u64,
    timer: Option<RefreshTimer>,
}

impl<H, R> std::fmt::Debug for PresentationDriver<H, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationDriver")
            .field("options", &self.options)
            .field("enabled", &self.enabled)
            .field("panel_attached", &self.panel_attached)
            .field("render_count", &self.render_count)
            .field("refreshing", &self.timer.is_some())
            .finish()
    }
}

impl<H: LensHost, R: PanelRenderer> PresentationDriver<H, R> {
    /// Create a driver with default options. The lens starts enabled with no panel attached.
    pub fn new(host: H, renderer: R) -> Self {
        Self {
            host,
            renderer,
            options: LensOptions::default(),
            enabled: true,
            panel_attached: false,
            render_count: 0,
            timer: None,
        }
    }

    /// Create a driver with validated `options`.
    pub fn with_options(host: H, renderer: R, options: LensOptions) -> Result<Self, LensError> {
        options.validate()?;
        let mut driver = Self::new(host, renderer);
        driver.options = options;
        Ok(driver)
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host (e.g. to publish diagnostics into a store).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The active options.
    pub fn options(&self) -> &LensOptions {
        &self.options
    }

    /// Whether the lens is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a panel is attached.
    pub fn is_panel_attached(&self) -> bool {
        self.panel_attached
    }

    /// Number of renders issued so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Attach the render target.
    ///
    /// Renders the resting view right away, before anything is measured, so the panel never
    /// shows stale or uninitialized content.
    pub fn attach_panel(&mut self) {
        self.panel_attached = true;
        self.render(PanelView::resting(self.enabled));
    }

    /// Detach the render target and stop the refresh timer.
    pub fn detach_panel(&mut self) {
        self.panel_attached = false;
        self.stop_refresh();
    }

    /// Start posting [`LensEvent::Tick`] into `events` every
    /// [`LensOptions::refresh_interval`].
    pub fn start_refresh(&mut self, events: Sender<LensEvent>) -> Result<(), LensError> {
        if let Some(timer) = &self.timer
            && timer.is_running()
        {
            return Err(LensError::RefreshAlreadyRunning(timer.interval()));
        }
        self.timer = Some(RefreshTimer::start(self.options.refresh_interval, events)?);
        Ok(())
    }

    /// Cancel the refresh timer, if running.
    pub fn stop_refresh(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Whether the refresh timer is running.
    pub fn is_refreshing(&self) -> bool {
        self.timer.as_ref().is_some_and(RefreshTimer::is_running)
    }

    /// Dispatch a host event. Returns `true` if the panel was re-rendered.
    pub fn handle(&mut self, event: LensEvent) -> bool {
        match event {
            LensEvent::Tick => self.on_tick(),
            LensEvent::DiagnosticsChanged(uris) => self.on_diagnostics_changed(&uris),
            LensEvent::ActiveDocumentChanged(uri) => self.on_active_document_changed(uri.as_ref()),
            LensEvent::DocumentOpened(uri) => self.on_document_opened(&uri),
            LensEvent::Enable => self.enable(),
            LensEvent::Disable => self.disable(),
        }
    }

    /// Periodic refresh: re-render the active document unconditionally.
    ///
    /// Unlike event-driven refreshes, a tick measures the active document whatever its scheme.
    pub fn on_tick(&mut self) -> bool {
        if !self.panel_attached {
            log::trace!("tick ignored: no panel attached");
            return false;
        }
        let view = self.current_view();
        self.render(view);
        true
    }

    /// Diagnostics changed for `uris`. Only the active document is re-rendered.
    pub fn on_diagnostics_changed(&mut self, uris: &[DocumentUri]) -> bool {
        let Some(active) = self.host.active_document() else {
            log::trace!("diagnostics change ignored: no active document");
            return false;
        };
        match uris.iter().find(|uri| **uri == active) {
            Some(uri) => {
                let uri = uri.clone();
                self.refresh(&uri)
            }
            None => {
                log::trace!("diagnostics change ignored: {} not affected", active);
                false
            }
        }
    }

    /// The focused editor changed.
    pub fn on_active_document_changed(&mut self, uri: Option<&DocumentUri>) -> bool {
        match uri {
            Some(uri) => self.refresh(uri),
            None => false,
        }
    }

    /// A document was opened. Only re-renders if it is the active document.
    pub fn on_document_opened(&mut self, uri: &DocumentUri) -> bool {
        if self.host.active_document().as_ref() != Some(uri) {
            log::trace!("open of {} ignored: not the active document", uri);
            return false;
        }
        self.refresh(uri)
    }

    /// Enable the lens and refresh the active document. Idempotent.
    pub fn enable(&mut self) -> bool {
        self.enabled = true;
        self.refresh_active()
    }

    /// Disable the lens and refresh the active document (showing the resting view). Idempotent.
    pub fn disable(&mut self) -> bool {
        self.enabled = false;
        self.refresh_active()
    }

    /// The view a tick would render now, without rendering it.
    pub fn current_view(&self) -> PanelView {
        if !self.enabled {
            return PanelView::resting(false);
        }
        match self.host.active_document() {
            Some(uri) => self.measure(&uri),
            None => PanelView::resting(true),
        }
    }

    fn measure(&self, uri: &DocumentUri) -> PanelView {
        let aggregation = aggregate(self.host.diagnostics(uri));
        PanelView::measured(aggregation.tally, &self.options.thresholds)
    }

    fn refresh_active(&mut self) -> bool {
        match self.host.active_document() {
            Some(uri) => self.refresh(&uri),
            None => false,
        }
    }

    fn refresh(&mut self, target: &DocumentUri) -> bool {
        if !target.is_local_file() {
            log::trace!("refresh skipped: {} is not a local file", target);
            return false;
        }
        if self.host.active_document().is_none() {
            log::trace!("refresh skipped: no active document");
            return false;
        }
        if !self.panel_attached {
            log::trace!("refresh skipped: no panel attached");
            return false;
        }

        let view = if self.enabled {
            self.measure(target)
        } else {
            PanelView::resting(false)
        };
        self.render(view);
        true
    }

    fn render(&mut self, view: PanelView) {
        log::debug!(
            "render: {} ({:?}), {} ({:?})",
            view.error_label(),
            view.error_tier,
            view.warning_label(),
            view.warning_tier
        );
        self.renderer.render(&view);
        self.render_count += 1;
    }
}
