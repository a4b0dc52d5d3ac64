#![forbid(unsafe_code)]

//! Scripted [`ContentLoader`].
//!
//! Responses are keyed by the request's base URL (before cache busting).
//! A route can answer immediately, after a tokio delay, or once a test
//! releases it. Unknown URLs answer HTTP 404. Every request is logged.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use scrim_modal::{ContentLoader, FetchRequest, LoadError};
use scrim_runtime::{Resolver, Signal, signal};

enum Release {
    Now,
    After(Duration),
    On(Signal),
}

struct Route {
    reply: Result<String, LoadError>,
    release: Release,
}

/// Loader answering from a table of canned responses.
#[derive(Default)]
pub struct ScriptedLoader {
    routes: RefCell<HashMap<String, Vec<Route>>>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl ScriptedLoader {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn push(&self, url: &str, route: Route) {
        self.routes
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push(route);
    }

    /// Answer `url` with `html`.
    ///
    /// Routes queued for the same URL answer successive requests; the last
    /// one keeps answering.
    pub fn respond(&self, url: &str, html: impl Into<String>) {
        self.push(
            url,
            Route {
                reply: Ok(html.into()),
                release: Release::Now,
            },
        );
    }

    /// Answer `url` with `html` after `delay` of tokio time.
    pub fn respond_after(&self, url: &str, html: impl Into<String>, delay: Duration) {
        self.push(
            url,
            Route {
                reply: Ok(html.into()),
                release: Release::After(delay),
            },
        );
    }

    /// Answer `url` with `html` once the returned resolver fires. Rejecting
    /// the resolver turns the answer into a network error.
    pub fn hold(&self, url: &str, html: impl Into<String>) -> Resolver {
        let (resolver, token) = signal();
        self.push(
            url,
            Route {
                reply: Ok(html.into()),
                release: Release::On(token),
            },
        );
        resolver
    }

    /// Fail requests for `url` with `error`.
    pub fn fail(&self, url: &str, error: LoadError) {
        self.push(
            url,
            Route {
                reply: Err(error),
                release: Release::Now,
            },
        );
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.borrow().clone()
    }

    /// Effective URLs requested so far.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.effective_url.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn next_route(&self, url: &str) -> Option<Route> {
        let mut routes = self.routes.borrow_mut();
        let queue = routes.get_mut(url)?;
        if queue.len() > 1 {
            return Some(queue.remove(0));
        }
        let last = queue.first_mut()?;
        let release = match &last.release {
            Release::After(delay) => Release::After(*delay),
            // Signals are one-shot; later requests answer immediately.
            Release::Now | Release::On(_) => Release::Now,
        };
        let release = std::mem::replace(&mut last.release, release);
        Some(Route {
            reply: last.reply.clone(),
            release,
        })
    }
}

impl ContentLoader for ScriptedLoader {
    fn fetch(&self, request: FetchRequest) -> LocalBoxFuture<'static, Result<String, LoadError>> {
        tracing::debug!(url = %request.effective_url, cache = request.cache, "scripted fetch");
        let route = self.next_route(&request.url);
        let url = request.effective_url.clone();
        self.requests.borrow_mut().push(request);
        Box::pin(async move {
            let Some(route) = route else {
                return Err(LoadError::Http { url, status: 404 });
            };
            match route.release {
                Release::Now => {}
                Release::After(delay) => tokio::time::sleep(delay).await,
                Release::On(token) => {
                    if token.await.is_err() {
                        return Err(LoadError::Network {
                            url,
                            message: "connection reset".into(),
                        });
                    }
                }
            }
            route.reply
        })
    }
}

impl std::fmt::Debug for ScriptedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedLoader")
            .field("routes", &self.routes.borrow().keys().collect::<Vec<_>>())
            .field("requests", &self.request_count())
            .finish()
    }
}
