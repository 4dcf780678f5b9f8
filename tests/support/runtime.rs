//! Shared Tokio runtime and mock server helpers for behavioural tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    let shared_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Mounts `mocks` on the scenario's server, starting it if needed.
///
/// # Panics
///
/// Panics when the runtime or server cannot be initialised.
pub fn mount_all(runtime: &Slot<SharedRuntime>, server: &Slot<MockServer>, mocks: Vec<Mock>) {
    let shared_runtime = ensure_runtime_and_server(runtime, server)
        .unwrap_or_else(|error| panic!("failed to start mock server: {error}"));

    server
        .with_ref(|mock_server| {
            for mock in mocks {
                shared_runtime.block_on(mock.mount(mock_server));
            }
        })
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Counts requests the server received for `verb` on `request_path`.
///
/// # Panics
///
/// Panics when the server was never started or request recording is off.
pub fn count_requests(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
    verb: &str,
    request_path: &str,
) -> usize {
    let shared_runtime = runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    let requests = server
        .with_ref(|mock_server| shared_runtime.block_on(mock_server.received_requests()))
        .flatten()
        .unwrap_or_else(|| panic!("mock server did not record requests"));

    requests
        .iter()
        .filter(|request| request.method.as_str() == verb && request.url.path() == request_path)
        .count()
}
