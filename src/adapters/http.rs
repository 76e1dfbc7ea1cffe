//! HTTP server adapter (ESP-IDF only).
//!
//! Implements [`RouteRegistrar`] on top of `EspHttpServer`. Each
//! registered [`RouteHandler`] gets the request URI, returns a rendered
//! [`ApiResponse`](crate::api::ApiResponse), and this adapter writes the
//! status line, headers and body back.
//!
//! Wildcard URI matching is enabled so `OPTIONS /*` catches every
//! preflight.

use esp_idf_svc::http::Method as HttpMethod;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::{EspIOError, Write};
use log::info;

use crate::api::{ApiRequest, Method};
use crate::app::ports::{RouteHandler, RouteRegistrar};
use crate::error::Error;

/// Handler task stack. History serialization runs on it.
const SERVER_STACK_BYTES: usize = 10 * 1024;

pub fn start_server(port: u16) -> Result<EspHttpServer<'static>, Error> {
    let config = Configuration {
        http_port: port,
        uri_match_wildcard: true,
        stack_size: SERVER_STACK_BYTES,
        ..Default::default()
    };
    let server = EspHttpServer::new(&config).map_err(|_| Error::Init("http server"))?;
    info!("http: listening on port {}", port);
    Ok(server)
}

fn to_http(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::Get,
        Method::Post => HttpMethod::Post,
        Method::Options => HttpMethod::Options,
    }
}

pub struct EspRouteRegistrar<'s> {
    server: &'s mut EspHttpServer<'static>,
}

impl<'s> EspRouteRegistrar<'s> {
    pub fn new(server: &'s mut EspHttpServer<'static>) -> Self {
        Self { server }
    }
}

impl RouteRegistrar for EspRouteRegistrar<'_> {
    fn register(
        &mut self,
        method: Method,
        path: &'static str,
        handler: RouteHandler,
    ) -> Result<(), Error> {
        self.server
            .fn_handler(path, to_http(method), move |req| -> Result<(), EspIOError> {
                let uri = req.uri().to_owned();
                let resp = handler(&ApiRequest::from_uri(method, &uri));
                let headers = resp.headers();
                let mut out = req.into_response(resp.status, Some(resp.reason()), headers.as_slice())?;
                out.write_all(&resp.body)?;
                Ok(())
            })
            .map_err(|_| Error::Init("http route"))?;
        Ok(())
    }
}
