use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::USER_AGENT,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::quiz::ClientMetadata;

/// Records the caller's user agent, browser and address on every request so
/// handlers can attach them to stored attempts.
pub struct ClientMetadataMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ClientMetadataMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ClientMetadataMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClientMetadataMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct ClientMetadataMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ClientMetadataMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let metadata = metadata_from_request(req.request());
        req.extensions_mut().insert(metadata);

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn metadata_from_request(req: &HttpRequest) -> ClientMetadata {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or_default()
        .to_string();

    ClientMetadata::from_user_agent(user_agent).with_ip_address(&ip_address)
}

/// Uses what the middleware recorded, or reads the headers directly when it
/// is not installed.
impl FromRequest for ClientMetadata {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let recorded = req.extensions().get::<ClientMetadata>().cloned();
        let metadata = recorded.unwrap_or_else(|| metadata_from_request(req));

        ready(Ok(metadata))
    }
}
