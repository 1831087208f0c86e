//! gRPC transport over a tonic channel

use async_trait::async_trait;
use futures::stream::BoxStream;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Certificate, Channel, ClientTlsConfig};

use super::{Credential, Endpoint, VectorTransport};
use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::proto::{self, path};

/// `VectorTransport` backed by a lazily connecting tonic channel
#[derive(Clone)]
pub struct GrpcTransport {
    channel: Channel,
}

impl GrpcTransport {
    /// Configure the channel without connecting
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(endpoint: &Endpoint, config: &ClientConfig) -> Result<Self> {
        let mut builder = tonic::transport::Endpoint::from_shared(endpoint.uri())
            .map_err(|e| {
                Error::Configuration(format!("invalid endpoint {}: {}", endpoint.host_port(), e))
            })?
            .connect_timeout(config.connect_timeout());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if endpoint.is_secure() {
            let tls = match endpoint.credential() {
                Some(Credential::Certificate(pem)) => {
                    ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem))
                }
                Some(Credential::SystemTrust) | None => ClientTlsConfig::new().with_native_roots(),
            };
            builder = builder
                .tls_config(tls)
                .map_err(|e| Error::Configuration(format!("invalid TLS configuration: {}", e)))?;
        }

        Ok(Self {
            channel: builder.connect_lazy(),
        })
    }

    async fn ready(&self) -> Result<Grpc<Channel>> {
        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready().await.map_err(|e| TransportError::Unavailable {
            message: e.to_string(),
        })?;
        Ok(grpc)
    }

    async fn unary<Req, Resp>(
        &self,
        operation: &'static str,
        path: &'static str,
        request: Req,
    ) -> Result<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                ProstCodec::<Req, Resp>::default(),
            )
            .await
            .map_err(|status| Error::from_status(operation, status))?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl VectorTransport for GrpcTransport {
    async fn insert(&self, request: proto::InsertRequest) -> Result<proto::InsertResponse> {
        self.unary("insert", path::INSERT, request).await
    }

    async fn search(&self, request: proto::SearchRequest) -> Result<proto::SearchResponse> {
        self.unary("search", path::SEARCH, request).await
    }

    async fn hybrid_search(
        &self,
        request: proto::HybridSearchRequest,
    ) -> Result<proto::SearchResponse> {
        self.unary("hybrid_search", path::HYBRID_SEARCH, request).await
    }

    async fn batch_insert(
        &self,
        requests: BoxStream<'static, proto::InsertRequest>,
    ) -> Result<proto::BatchInsertResponse> {
        let mut grpc = self.ready().await?;
        let response = grpc
            .client_streaming(
                tonic::Request::new(requests),
                PathAndQuery::from_static(path::BATCH_INSERT),
                ProstCodec::<proto::InsertRequest, proto::BatchInsertResponse>::default(),
            )
            .await
            .map_err(|status| Error::from_status("batch_insert", status))?;
        Ok(response.into_inner())
    }

    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse> {
        self.unary("update", path::UPDATE, request).await
    }

    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse> {
        self.unary("delete", path::DELETE, request).await
    }

    async fn get_stats(&self, request: proto::StatsRequest) -> Result<proto::StatsResponse> {
        self.unary("get_stats", path::GET_STATS, request).await
    }

    async fn health_check(
        &self,
        request: proto::HealthCheckRequest,
    ) -> Result<proto::HealthCheckResponse> {
        self.unary("health_check", path::HEALTH_CHECK, request).await
    }
}
