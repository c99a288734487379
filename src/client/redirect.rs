// File: ./src/client/redirect.rs
//! Follows `Location` redirects of body-less requests up to a fixed hop count.
use http::{Request, Response, Uri};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::ServiceExt;
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
}

impl FollowRedirectLayer {
    pub fn new(max_redirects: usize) -> Self {
        Self { max_redirects }
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirectService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirectService {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FollowRedirectService<S> {
    inner: S,
    max_redirects: usize,
}

/// Resolves a `Location` value against the URI that produced it
/// (RFC 3986 section 5.2, fragments dropped).
pub fn resolve_location(base: &Uri, location: &str) -> Option<Uri> {
    let location = location.split('#').next().unwrap_or_default().trim();
    if has_scheme(location) {
        return location.parse().ok();
    }
    let scheme = base.scheme_str()?;
    if let Some(rest) = location.strip_prefix("//") {
        return format!("{}://{}", scheme, rest).parse().ok();
    }
    let authority = base.authority()?;

    let (path, query) = match location.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (location, None),
    };
    let mut target = if path.is_empty() {
        base.path().to_string()
    } else if path.starts_with('/') {
        remove_dot_segments(path)
    } else {
        let dir = base.path().rsplit_once('/').map_or("", |(dir, _)| dir);
        remove_dot_segments(&format!("{}/{}", dir, path))
    };
    match query {
        Some(q) => {
            target.push('?');
            target.push_str(q);
        }
        None if path.is_empty() => {
            if let Some(q) = base.query() {
                target.push('?');
                target.push_str(q);
            }
        }
        None => {}
    }
    format!("{}://{}{}", scheme, authority, target).parse().ok()
}

fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn remove_dot_segments(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match *segment {
            "." => {
                if last {
                    out.push("");
                }
            }
            ".." => {
                out.pop();
                if last {
                    out.push("");
                }
            }
            s => out.push(s),
        }
    }
    format!("/{}", out.join("/"))
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for FollowRedirectService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    ReqBody: Default + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut inner = self.inner.clone();
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let method = req.method().clone();
            let headers = req.headers().clone();
            let mut uri = req.uri().clone();
            let mut response = inner.ready().await?.call(req).await?;

            // A final 3xx response means the hop limit was reached.
            for _ in 0..max_redirects {
                if !response.status().is_redirection() {
                    break;
                }
                let Some(next) = response
                    .headers()
                    .get(http::header::LOCATION)
                    .and_then(|l| l.to_str().ok())
                    .and_then(|l| resolve_location(&uri, l))
                else {
                    break;
                };

                let mut follow = Request::new(ReqBody::default());
                *follow.method_mut() = method.clone();
                *follow.headers_mut() = headers.clone();
                *follow.uri_mut() = next.clone();
                uri = next;
                response = inner.ready().await?.call(follow).await?;
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_location() {
        let base: Uri = "https://example.com/a/b?x=1".parse().unwrap();
        assert_eq!(
            resolve_location(&base, "/c").unwrap().to_string(),
            "https://example.com/c"
        );
        assert_eq!(
            resolve_location(&base, "http://other.org/d").unwrap().to_string(),
            "http://other.org/d"
        );
        assert_eq!(
            resolve_location(&base, "neu").unwrap().to_string(),
            "https://example.com/a/neu"
        );
        assert_eq!(
            resolve_location(&base, "../x?y=2#top").unwrap().to_string(),
            "https://example.com/x?y=2"
        );
        assert_eq!(
            resolve_location(&base, "./").unwrap().to_string(),
            "https://example.com/a/"
        );
        assert_eq!(
            resolve_location(&base, "//cdn.example.org/p").unwrap().to_string(),
            "https://cdn.example.org/p"
        );
        assert_eq!(
            resolve_location(&base, "?z=3").unwrap().to_string(),
            "https://example.com/a/b?z=3"
        );
    }
}
