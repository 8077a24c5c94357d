// src/testing/hooks.rs
use crate::application::{ports::StoragePort, ports::time::Clock, services::ApplicationServices};
use crate::config::AppConfig;
use crate::domain::{
    keyword::KeywordRepository, krate::CrateReadRepository, session::Session,
    session::SessionRepository, user::User,
};
use crate::infrastructure::storage::InMemoryStorage;
use crate::presentation::http::{routes::build_router, state::HttpState};
use crate::testing::{
    browser::Browser,
    clock::MockClock,
    error::{HarnessError, HarnessResult},
    server::MockServer,
    setup::Authenticator,
};
use axum::Router;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::Arc;

type Hook = Box<dyn Fn(&mut TestContext) -> HarnessResult<()> + Send + Sync>;

/// Per-test lifecycle registry.
#[derive(Default)]
pub struct Hooks {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut TestContext) -> HarnessResult<()> + Send + Sync + 'static,
    {
        self.before.push(Box::new(hook));
    }

    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut TestContext) -> HarnessResult<()> + Send + Sync + 'static,
    {
        self.after.push(Box::new(hook));
    }

    /// Runs `body` between the registered hooks.
    ///
    /// After-each hooks run even when a before-each hook fails or the body
    /// errors or panics, whether it panics while building its future or while
    /// polling it; a panic resumes once they are done. The first error
    /// wins: setup, then body, then teardown.
    pub async fn run<F>(&self, cx: &mut TestContext, body: F) -> HarnessResult<()>
    where
        F: for<'a> FnOnce(&'a mut TestContext) -> LocalBoxFuture<'a, HarnessResult<()>>,
    {
        let setup = self.before.iter().try_for_each(|hook| hook(cx));

        let outcome = match setup {
            Ok(()) => match catch_unwind(AssertUnwindSafe(|| body(cx))) {
                Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
                Err(panic) => Err(panic),
            },
            Err(err) => {
                tracing::error!(error = %err, "before-each hook failed");
                Ok(Err(err))
            }
        };

        let mut teardown = Ok(());
        for hook in &self.after {
            if let Err(err) = hook(cx) {
                tracing::error!(error = %err, "after-each hook failed");
                if teardown.is_ok() {
                    teardown = Err(err);
                }
            }
        }

        match outcome {
            Err(panic) => resume_unwind(panic),
            Ok(result) => result.and(teardown),
        }
    }
}

/// State one test sees: the clock plus whatever the before-each hooks
/// installed.
pub struct TestContext {
    clock: MockClock,
    config: AppConfig,
    server: Option<Arc<MockServer>>,
    storage: Option<Arc<InMemoryStorage>>,
    authenticator: Option<Authenticator>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(MockClock::new(), AppConfig::default())
    }
}

impl TestContext {
    pub fn new(clock: MockClock, config: AppConfig) -> Self {
        Self {
            clock,
            config,
            server: None,
            storage: None,
            authenticator: None,
        }
    }

    pub fn clock(&self) -> &MockClock {
        &self.clock
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn set_server(&mut self, server: Arc<MockServer>) {
        self.server = Some(server);
    }

    pub fn server(&self) -> HarnessResult<Arc<MockServer>> {
        self.server
            .clone()
            .ok_or(HarnessError::NotInitialized("mock server"))
    }

    pub fn set_storage(&mut self, storage: Arc<InMemoryStorage>) {
        self.storage = Some(storage);
    }

    pub fn storage(&self) -> HarnessResult<Arc<InMemoryStorage>> {
        self.storage
            .clone()
            .ok_or(HarnessError::NotInitialized("window storage"))
    }

    pub fn set_authenticator(&mut self, authenticator: Authenticator) {
        self.authenticator = Some(authenticator);
    }

    /// Logs `user` in on both the backend and the window.
    pub fn authenticate_as(&self, user: &User) -> HarnessResult<Session> {
        let authenticator = self
            .authenticator
            .as_ref()
            .ok_or(HarnessError::NotInitialized("authenticate_as"))?;
        Ok(authenticator.authenticate_as(user))
    }

    /// Application router backed by this test's server and clock.
    pub fn application(&self) -> HarnessResult<Router> {
        let registry = self.server()?.registry();
        let crate_repo: Arc<dyn CrateReadRepository> = registry.clone();
        let keyword_repo: Arc<dyn KeywordRepository> = registry.clone();
        let session_repo: Arc<dyn SessionRepository> = registry;
        let clock: Arc<dyn Clock> = Arc::new(self.clock.clone());

        let services = ApplicationServices::new(
            crate_repo,
            keyword_repo,
            session_repo,
            clock,
            self.config.limits(),
        );
        Ok(build_router(HttpState {
            services: Arc::new(services),
            config: self.config.clone(),
        }))
    }

    /// A browser window on the application, sharing this test's storage.
    pub fn browser(&self) -> HarnessResult<Browser> {
        let storage: Arc<StoragePort> = self.storage()?;
        Ok(Browser::new(self.application()?, storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn hooks_wrap_the_body_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = Hooks::new();
        let before = Arc::clone(&log);
        hooks.before_each(move |_| {
            before.lock().unwrap().push("before");
            Ok(())
        });
        let after = Arc::clone(&log);
        hooks.after_each(move |_| {
            after.lock().unwrap().push("after");
            Ok(())
        });

        let body_log = Arc::clone(&log);
        let mut cx = TestContext::default();
        hooks
            .run(&mut cx, |_| {
                Box::pin(async move {
                    body_log.lock().unwrap().push("body");
                    Ok::<(), HarnessError>(())
                })
            })
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["before", "body", "after"]);
    }

    #[tokio::test]
    async fn failing_setup_skips_body_but_runs_teardown() {
        let ran_after = Arc::new(Mutex::new(false));
        let mut hooks = Hooks::new();
        hooks.before_each(|_| Err(HarnessError::Failed("no backend".into())));
        let flag = Arc::clone(&ran_after);
        hooks.after_each(move |_| {
            *flag.lock().unwrap() = true;
            Ok(())
        });

        let mut cx = TestContext::default();
        let result = hooks
            .run(&mut cx, |_| {
                Box::pin(async { Err::<(), _>(HarnessError::Failed("body ran".into())) })
            })
            .await;

        assert!(matches!(result, Err(HarnessError::Failed(msg)) if msg == "no backend"));
        assert!(*ran_after.lock().unwrap());
    }

    #[test]
    fn accessors_report_missing_setup() {
        let cx = TestContext::default();
        assert!(matches!(cx.server(), Err(HarnessError::NotInitialized(_))));
        assert!(matches!(cx.browser(), Err(HarnessError::NotInitialized(_))));
    }
}
