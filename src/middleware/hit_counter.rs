use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared count of requests served by the static file server.
///
/// Cloning shares the same counter; register one instance as `web::Data`
/// and hand clones to every `FileServerHits` wrap.
#[derive(Debug, Clone, Default)]
pub struct HitCounter {
    hits: Arc<AtomicU64>,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::SeqCst);
    }
}

/// Counts every request that reaches the wrapped service
pub struct FileServerHits {
    counter: HitCounter,
}

impl FileServerHits {
    pub fn new(counter: HitCounter) -> Self {
        Self { counter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for FileServerHits
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = FileServerHitsService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(FileServerHitsService {
            service: Rc::new(service),
            counter: self.counter.clone(),
        }))
    }
}

pub struct FileServerHitsService<S> {
    service: Rc<S>,
    counter: HitCounter,
}

impl<S, B> Service<ServiceRequest> for FileServerHitsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let hits = self.counter.increment();
        tracing::debug!(path = %req.path(), hits, "File server hit");

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
