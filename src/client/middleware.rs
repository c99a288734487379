// File: ./src/client/middleware.rs
//! Tower middleware setting the User-Agent of every link check request.
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    user_agent: Option<HeaderValue>,
}

impl UserAgentLayer {
    /// An agent string that is not a valid header value is dropped.
    pub fn new(user_agent: &str) -> Self {
        let user_agent = HeaderValue::from_str(user_agent)
            .inspect_err(|e| log::warn!("ignoring user agent '{}': {}", user_agent, e))
            .ok();
        Self { user_agent }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    user_agent: Option<HeaderValue>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Some(val) = &self.user_agent {
            req.headers_mut().insert(http::header::USER_AGENT, val.clone());
        }
        self.inner.call(req)
    }
}
