//! Event loop driving a [`CatalogController`].
//!
//! One task owns the controller. It multiplexes incoming events with the
//! debounce timer, the outstanding search, the post-checkout refresh timer
//! and notification expiry, and re-renders after every step.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use super::catalog::{CatalogController, CatalogEffect};
use super::debounce::Debouncer;
use crate::api::CancelHandle;
use crate::dispatch::CatalogEvent;
use crate::error::AppResult;
use crate::models::SearchPage;
use crate::view::{CatalogView, NOTIFICATION_TTL};

type SearchFuture = Pin<Box<dyn Future<Output = AppResult<SearchPage>> + Send>>;

pub struct CatalogSession {
    controller: CatalogController,
    debounce: Debouncer,
    refresh: Debouncer,
    expiry: Debouncer,
    in_flight: Option<SearchFuture>,
    /// Sequence number of the notification the expiry timer was armed for
    shown_notification: u64,
    cancel: Option<CancelHandle>,
}

impl CatalogSession {
    pub fn new(controller: CatalogController) -> Self {
        let config = controller.config();
        Self {
            debounce: Debouncer::new(config.debounce()),
            refresh: Debouncer::new(config.refresh_delay()),
            expiry: Debouncer::new(NOTIFICATION_TTL),
            in_flight: None,
            shown_notification: 0,
            cancel: None,
            controller,
        }
    }

    /// Abort the outstanding request through `cancel` when the session closes
    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn controller(&self) -> &CatalogController {
        &self.controller
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Health probe, then the initial search
    pub async fn start(&mut self) {
        tracing::info!("Starting catalog session");
        self.controller.check_health().await;
        self.run_effect(CatalogEffect::Search).await;
    }

    /// Process events until the sender side closes, then hand the controller back.
    pub async fn run<F>(
        mut self,
        mut events: mpsc::Receiver<CatalogEvent>,
        mut render: F,
    ) -> CatalogController
    where
        F: FnMut(&CatalogView),
    {
        render(&self.controller.render());
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        tracing::trace!("Catalog event {:?}", event);
                        if let Some(effect) = self.controller.handle(event) {
                            self.run_effect(effect).await;
                        }
                    }
                    None => break,
                },
                result = next_result(&mut self.in_flight) => {
                    self.in_flight = None;
                    self.controller.finish_search(result);
                }
                _ = self.debounce.fired() => {
                    let effect = self.controller.debounce_elapsed();
                    self.run_effect(effect).await;
                }
                _ = self.refresh.fired() => {
                    let effect = self.controller.refresh_due();
                    self.run_effect(effect).await;
                }
                _ = self.expiry.fired() => {
                    self.controller.dismiss_notification();
                }
            }
            self.sync_timers();
            render(&self.controller.render());
        }
        if self.in_flight.take().is_some() {
            tracing::debug!("Cancelling the outstanding search");
            if let Some(cancel) = &self.cancel {
                cancel.cancel();
            }
        }
        tracing::info!("Catalog session closed");
        self.controller
    }

    async fn run_effect(&mut self, effect: CatalogEffect) {
        match effect {
            CatalogEffect::Render => {}
            CatalogEffect::Debounce => self.debounce.bump(),
            CatalogEffect::Search => {
                self.debounce.cancel();
                if let Some(query) = self.controller.begin_search() {
                    let api = self.controller.api();
                    tracing::debug!("Searching {:?}", query);
                    self.in_flight = Some(Box::pin(async move { api.search(&query).await }));
                }
            }
            CatalogEffect::Checkout { isbn, card_input } => {
                if let Some(request) = self.controller.begin_checkout(&isbn, &card_input) {
                    let result = self.controller.api().checkout(&request).await;
                    self.controller.finish_checkout(&request, result);
                }
            }
        }
        self.sync_timers();
    }

    /// Arm the refresh and expiry timers from controller state
    fn sync_timers(&mut self) {
        let ui = self.controller.ui();
        if ui.refresh_pending && !self.refresh.is_pending() {
            self.refresh.bump();
        }
        if ui.notification.is_none() {
            self.expiry.cancel();
        } else if ui.notification_seq != self.shown_notification {
            self.shown_notification = ui.notification_seq;
            self.expiry.bump();
        }
    }
}

async fn next_result(in_flight: &mut Option<SearchFuture>) -> AppResult<SearchPage> {
    match in_flight {
        Some(search) => search.await,
        None => std::future::pending().await,
    }
}
