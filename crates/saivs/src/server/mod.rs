//! Line-oriented request server behind the `saiserver` binary.
//!
//! [`serve`] reads newline-delimited JSON [`Request`]s and writes one JSON
//! [`Response`] per request, in request order. Reads and decision requests
//! run concurrently on blocking workers, bounded by a semaphore; a
//! mutation waits for every earlier request before it runs, so a script
//! observes its own writes. Cancelling the session token stops reading and
//! marks unstarted bulk items as not attempted.

pub mod request;
pub mod response;

pub use request::{Request, RequestError};
pub use response::Response;

use crate::acl::AclKey;
use crate::api::{Operation, OperationItem, OperationKind, SwitchEngine};
use crate::config::EngineConfig;
use crate::schema::{Attribute, SchemaRegistry};
use crate::types::{ObjectType, RawSaiObjectId};
use crate::value::AttrValue;
use log::{debug, info, warn};
use parking_lot::RwLock;
use request::{
    object_type_of, parse_attr_ids, parse_attribute, parse_attributes, parse_object_type,
    resolve_key_ids, resolve_oid, Labels,
};
use response::format_attributes;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One engine plus the labels and cancellation token of a request stream.
pub struct Session {
    engine: SwitchEngine,
    labels: RwLock<Labels>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Session {
            engine: SwitchEngine::new(config),
            labels: RwLock::new(Labels::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn engine(&self) -> &SwitchEngine {
        &self.engine
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Parses and executes one request line.
    pub fn execute_line(&self, line: &str) -> Response {
        match Request::parse(line) {
            Ok(request) => self.execute(&request),
            Err(e) => Response::from_error(&e),
        }
    }

    pub fn execute(&self, request: &Request) -> Response {
        match self.try_execute(request) {
            Ok(response) => response,
            Err(e) => {
                debug!("Request failed: {}", e);
                Response::from_error(&e)
            }
        }
    }

    fn resolve(&self, text: &str) -> Result<RawSaiObjectId, RequestError> {
        resolve_oid(text, &self.labels.read())
    }

    fn run(&self, operation: Operation) -> crate::api::OperationResult {
        self.engine.handle_with_cancel(&operation, Some(&self.cancel))
    }

    fn packet_key(
        &self,
        key: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<AclKey, RequestError> {
        let key = resolve_key_ids(key.clone(), &self.labels.read())?;
        Ok(serde_json::from_value(serde_json::Value::Object(key))?)
    }

    fn try_execute(&self, request: &Request) -> Result<Response, RequestError> {
        let registry = SchemaRegistry::global();
        match request {
            Request::Create {
                object_type,
                attributes,
                label,
            } => {
                let object_type = parse_object_type(object_type)?;
                let attributes =
                    parse_attributes(registry, object_type, attributes, &self.labels.read())?;
                let result = self.run(Operation::create(object_type, attributes));
                if let (Some(label), Some(oid)) = (label, result.object_id) {
                    self.labels.write().insert(label.clone(), oid);
                }
                Ok(Response::from_operation(result, None, &[]))
            }
            Request::Remove { object_id } => {
                let oid = self.resolve(object_id)?;
                Ok(Response::from_operation(self.run(Operation::remove(oid)), None, &[]))
            }
            Request::Set {
                object_id,
                attribute,
                value,
            } => {
                let oid = self.resolve(object_id)?;
                let attribute = parse_attribute(
                    registry,
                    object_type_of(oid)?,
                    attribute,
                    value,
                    &self.labels.read(),
                )?;
                Ok(Response::from_operation(self.run(Operation::set(oid, attribute)), None, &[]))
            }
            Request::Get {
                object_id,
                attributes,
            } => {
                let oid = self.resolve(object_id)?;
                let object_type = object_type_of(oid)?;
                let ids = parse_attr_ids(registry, object_type, attributes)?;
                let result = self.run(Operation::get(oid, ids));
                Ok(Response::from_operation(result, Some(object_type), &[]).with_object(oid))
            }
            Request::BulkCreate {
                object_type,
                items,
                mode,
            } => {
                let object_type = parse_object_type(object_type)?;
                let labels = self.labels.read();
                let items = items
                    .iter()
                    .map(|attrs| {
                        Ok(OperationItem {
                            attributes: parse_attributes(registry, object_type, attrs, &labels)?,
                            ..OperationItem::default()
                        })
                    })
                    .collect::<Result<Vec<_>, RequestError>>()?;
                drop(labels);
                let operation = Operation::bulk(OperationKind::BulkCreate, items, *mode)
                    .with_object_type(object_type);
                Ok(Response::from_operation(self.run(operation), None, &[]))
            }
            Request::BulkRemove { object_ids, mode } => {
                let items = object_ids
                    .iter()
                    .map(|text| {
                        Ok(OperationItem {
                            object_id: Some(self.resolve(text)?),
                            ..OperationItem::default()
                        })
                    })
                    .collect::<Result<Vec<_>, RequestError>>()?;
                let operation = Operation::bulk(OperationKind::BulkRemove, items, *mode);
                Ok(Response::from_operation(self.run(operation), None, &[]))
            }
            Request::BulkSet { items, mode } => {
                let items = items
                    .iter()
                    .map(|item| {
                        let oid = self.resolve(&item.object_id)?;
                        let attribute = parse_attribute(
                            registry,
                            object_type_of(oid)?,
                            &item.attribute,
                            &item.value,
                            &self.labels.read(),
                        )?;
                        Ok(OperationItem {
                            object_id: Some(oid),
                            attributes: vec![attribute],
                            ..OperationItem::default()
                        })
                    })
                    .collect::<Result<Vec<_>, RequestError>>()?;
                let operation = Operation::bulk(OperationKind::BulkSet, items, *mode);
                Ok(Response::from_operation(self.run(operation), None, &[]))
            }
            Request::BulkGet { items, mode } => {
                let mut types: Vec<ObjectType> = Vec::with_capacity(items.len());
                let mut operation_items = Vec::with_capacity(items.len());
                for item in items {
                    let oid = self.resolve(&item.object_id)?;
                    let object_type = object_type_of(oid)?;
                    operation_items.push(OperationItem {
                        object_id: Some(oid),
                        attr_ids: parse_attr_ids(registry, object_type, &item.attributes)?,
                        ..OperationItem::default()
                    });
                    types.push(object_type);
                }
                let operation = Operation::bulk(OperationKind::BulkGet, operation_items, *mode);
                Ok(Response::from_operation(self.run(operation), None, &types))
            }
            Request::AclEvaluate { stages, key } => {
                let key = self.packet_key(key)?;
                let verdict = self.engine.acl().evaluate_stages(stages, &key)?;
                Ok(Response::ok().with_result(serde_json::to_value(&verdict)?))
            }
            Request::RouteResolve { vr, address } => {
                let vr = self.resolve(vr)?;
                let route = self.engine.routes().resolve_route(vr, address)?;
                Ok(Response::ok().with_result(serde_json::to_value(route)?))
            }
            Request::GroupResolve {
                group,
                selector,
                flow,
            } => {
                let group = self.resolve(group)?;
                let routes = self.engine.routes();
                let selector = match flow {
                    Some(flow) => routes.flow_hash(flow),
                    None => selector.unwrap_or(0),
                };
                let next_hop = routes.resolve_group(group, selector)?;
                Ok(Response::ok().with_object(next_hop))
            }
            Request::Forward { vr, key } => {
                let vr = self.resolve(vr)?;
                let key = self.packet_key(key)?;
                let decision = self.engine.pipeline().decide(vr, &key)?;
                Ok(Response::ok().with_result(serde_json::to_value(&decision)?))
            }
            Request::OperStatus { object_id, up } => {
                let oid = self.resolve(object_id)?;
                self.engine.store().report_oper_status(oid, *up)?;
                Ok(Response::ok().with_object(oid))
            }
            Request::Stats { object_id, clear } => {
                let oid = self.resolve(object_id)?;
                let store = self.engine.store();
                let stats: Vec<Attribute> = store
                    .get_stats(oid)?
                    .into_iter()
                    .map(|(id, count)| Attribute::new(id, AttrValue::U64(count)))
                    .collect();
                if *clear {
                    store.clear_stats(oid)?;
                }
                let mut response = Response::ok().with_object(oid);
                response.attributes = format_attributes(object_type_of(oid)?, &stats);
                Ok(response)
            }
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> io::Result<()> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await
}

async fn join(handle: JoinHandle<Response>) -> io::Result<Response> {
    handle
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Writes every pending response, oldest first.
async fn drain<W: AsyncWrite + Unpin>(
    pending: &mut VecDeque<JoinHandle<Response>>,
    writer: &mut W,
) -> io::Result<()> {
    while let Some(handle) = pending.pop_front() {
        write_response(writer, &join(handle).await?).await?;
    }
    Ok(())
}

/// Serves requests from `reader` until end of input or cancellation and
/// returns the number of requests handled. Blank lines and lines starting
/// with `#` are skipped.
pub async fn serve<R, W>(
    session: Arc<Session>,
    reader: R,
    mut writer: W,
    workers: usize,
) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let cancel = session.cancel_token();
    let mut lines = reader.lines();
    let mut pending: VecDeque<JoinHandle<Response>> = VecDeque::new();
    let mut handled = 0;

    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Request stream cancelled after {} requests", handled);
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        handled += 1;

        let request = match Request::parse(trimmed) {
            Ok(request) => request,
            Err(e) => {
                drain(&mut pending, &mut writer).await?;
                write_response(&mut writer, &Response::from_error(&e)).await?;
                continue;
            }
        };

        if request.is_mutation() {
            drain(&mut pending, &mut writer).await?;
            let session = Arc::clone(&session);
            let response = join(tokio::task::spawn_blocking(move || session.execute(&request))).await?;
            write_response(&mut writer, &response).await?;
            continue;
        }

        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let session = Arc::clone(&session);
        pending.push_back(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            session.execute(&request)
        }));
        while pending.front().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = pending.pop_front() {
                write_response(&mut writer, &join(handle).await?).await?;
            }
        }
    }

    drain(&mut pending, &mut writer).await?;
    writer.flush().await?;
    info!("Served {} requests", handled);
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaiStatus;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = r#"
# topology
{"op":"create","object_type":"SAI_OBJECT_TYPE_VIRTUAL_ROUTER","as":"vr"}
{"op":"create","object_type":"SAI_OBJECT_TYPE_PORT","as":"p0","attributes":{"SAI_PORT_ATTR_HW_LANE_LIST":"1:0","SAI_PORT_ATTR_SPEED":"100000"}}
{"op":"create","object_type":"SAI_OBJECT_TYPE_ROUTER_INTERFACE","as":"rif","attributes":{"SAI_ROUTER_INTERFACE_ATTR_VIRTUAL_ROUTER_ID":"$vr","SAI_ROUTER_INTERFACE_ATTR_TYPE":"SAI_ROUTER_INTERFACE_TYPE_PORT","SAI_ROUTER_INTERFACE_ATTR_PORT_ID":"$p0"}}
{"op":"create","object_type":"SAI_OBJECT_TYPE_NEXT_HOP","as":"nh","attributes":{"SAI_NEXT_HOP_ATTR_TYPE":"SAI_NEXT_HOP_TYPE_IP","SAI_NEXT_HOP_ATTR_IP":"10.0.0.1","SAI_NEXT_HOP_ATTR_ROUTER_INTERFACE_ID":"$rif"}}
{"op":"create","object_type":"SAI_OBJECT_TYPE_ROUTE_ENTRY","attributes":{"SAI_ROUTE_ENTRY_ATTR_VR_ID":"$vr","SAI_ROUTE_ENTRY_ATTR_DESTINATION":"20.0.0.0/8","SAI_ROUTE_ENTRY_ATTR_NEXT_HOP_ID":"$nh"}}
{"op":"route_resolve","vr":"$vr","address":"20.1.2.3"}
{"op":"get","object_id":"$p0","attributes":["SAI_PORT_ATTR_MTU","SAI_PORT_ATTR_OPER_STATUS"]}
{"op":"remove","object_id":"$nh"}
not json
{"op":"route_resolve","vr":"$vr","address":"30.0.0.1"}
"#;

    #[tokio::test]
    async fn test_serve_script_in_order() {
        let session = Arc::new(Session::new(EngineConfig::default()));
        let mut output = Vec::new();
        let handled = serve(Arc::clone(&session), SCRIPT.as_bytes(), &mut output, 4)
            .await
            .unwrap();
        assert_eq!(handled, 10);

        let responses: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let statuses: Vec<SaiStatus> = responses.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::Ok,
                SaiStatus::ObjectInUse,
                SaiStatus::Failure,
                SaiStatus::NoRoute,
            ]
        );

        let nh = responses[3].object_id.clone().unwrap();
        let nh_oid = crate::value::parse_oid(&nh).unwrap();
        assert_eq!(
            responses[5].result,
            Some(serde_json::json!({"result": "next_hop", "oid": nh_oid}))
        );
        assert_eq!(
            responses[6].attributes.get("SAI_PORT_ATTR_MTU").map(String::as_str),
            Some("1514")
        );
        assert_eq!(
            responses[6]
                .attributes
                .get("SAI_PORT_ATTR_OPER_STATUS")
                .map(String::as_str),
            Some("SAI_PORT_OPER_STATUS_UNKNOWN")
        );
    }

    #[test]
    fn test_unknown_names_and_labels() {
        let session = Session::new(EngineConfig::default());
        let response = session.execute_line(r#"{"op":"create","object_type":"SAI_OBJECT_TYPE_WIDGET"}"#);
        assert_eq!(response.status, SaiStatus::Failure);

        let response = session.execute_line(
            r#"{"op":"create","object_type":"SAI_OBJECT_TYPE_VIRTUAL_ROUTER","attributes":{"SAI_VIRTUAL_ROUTER_ATTR_COLOR":"red"}}"#,
        );
        assert_eq!(response.status, SaiStatus::InvalidAttribute);

        let response = session.execute_line(r#"{"op":"remove","object_id":"$missing"}"#);
        assert_eq!(response.status, SaiStatus::NotFound);
        assert!(session.engine().store().is_empty());
    }

    #[test]
    fn test_bulk_set_then_bulk_get() {
        let session = Session::new(EngineConfig::default());
        session.execute_line(
            r#"{"op":"create","object_type":"SAI_OBJECT_TYPE_PORT","as":"p0","attributes":{"SAI_PORT_ATTR_HW_LANE_LIST":"1:0","SAI_PORT_ATTR_SPEED":"100000"}}"#,
        );
        let response = session.execute_line(
            r#"{"op":"bulk_set","mode":"ignore_error","items":[
                {"object_id":"$p0","attribute":"SAI_PORT_ATTR_MTU","value":"9100"},
                {"object_id":"$p0","attribute":"SAI_PORT_ATTR_MTU","value":"0"},
                {"object_id":"$p0","attribute":"SAI_PORT_ATTR_SPEED","value":"40000"}]}"#,
        );
        let statuses: Vec<SaiStatus> = response.items.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![SaiStatus::Ok, SaiStatus::InvalidAttribute, SaiStatus::Ok]
        );

        let response = session.execute_line(
            r#"{"op":"bulk_get","items":[{"object_id":"$p0","attributes":["SAI_PORT_ATTR_MTU","SAI_PORT_ATTR_SPEED"]}]}"#,
        );
        assert_eq!(
            response.items[0].attributes.get("SAI_PORT_ATTR_SPEED").map(String::as_str),
            Some("40000")
        );
    }

    #[test]
    fn test_stats_read_and_clear() {
        use crate::schema::catalog::counter;

        let session = Session::new(EngineConfig::default());
        session.execute_line(r#"{"op":"create","object_type":"SAI_OBJECT_TYPE_COUNTER","as":"c"}"#);
        let oid = session.resolve("$c").unwrap();
        {
            let view = session.engine().store().view();
            assert!(view.get(oid).unwrap().add_stat(counter::PACKETS, 5));
        }

        let response = session.execute_line(r#"{"op":"stats","object_id":"$c","clear":true}"#);
        assert_eq!(
            response.attributes.get("SAI_COUNTER_ATTR_PACKETS").map(String::as_str),
            Some("5")
        );
        let response = session.execute_line(r#"{"op":"stats","object_id":"$c"}"#);
        assert_eq!(
            response.attributes.get("SAI_COUNTER_ATTR_PACKETS").map(String::as_str),
            Some("0")
        );
    }

    #[tokio::test]
    async fn test_cancelled_session_stops_reading() {
        let session = Arc::new(Session::new(EngineConfig::default()));
        session.cancel_token().cancel();
        let mut output = Vec::new();
        let handled = serve(Arc::clone(&session), SCRIPT.as_bytes(), &mut output, 2)
            .await
            .unwrap();
        assert_eq!(handled, 0);
        assert!(output.is_empty());
    }
}
