mod auction_config;
mod cancel_bid;
mod cluster_lifecycle;
mod create_bid;
mod get_bid_by_id;
mod get_cluster_by_id;
mod get_node_operator;
mod get_num_bids;
mod get_winning_cluster;
mod remove_bid;
mod trigger_cluster;
mod update_bid;
mod whitelist;

use crate::{
    auctionhouse::Auctionhouse,
    metrics::{end_request, start_request, LabelledReply, Metrics},
};
use auction::error::AuctionError;
use serde::{de::DeserializeOwned, Serialize};
use std::{convert::Infallible, sync::Arc};
use warp::{
    hyper::StatusCode,
    reply::{json, with_status, Json, WithStatus},
    wrap_fn, Filter, Rejection, Reply,
};

pub fn handle_all_routes(
    auctionhouse: Arc<Auctionhouse>,
    metrics: Arc<Metrics>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let create_bid = create_bid::create_bid(auctionhouse.clone());
    let update_bid = update_bid::update_bid(auctionhouse.clone());
    let cancel_bid = cancel_bid::cancel_bid(auctionhouse.clone());
    let get_bid = get_bid_by_id::get_bid_by_id(auctionhouse.clone());
    let get_node_operator = get_node_operator::get_node_operator(auctionhouse.clone());
    let get_num_bids = get_num_bids::get_num_bids(auctionhouse.clone());
    let get_winning_cluster = get_winning_cluster::get_winning_cluster(auctionhouse.clone());
    let trigger_cluster = trigger_cluster::trigger_cluster(auctionhouse.clone());
    let get_cluster = get_cluster_by_id::get_cluster_by_id(auctionhouse.clone());
    let mark_deposited = cluster_lifecycle::mark_deposited(auctionhouse.clone());
    let clear_cluster = cluster_lifecycle::clear_cluster(auctionhouse.clone());
    let get_config = auction_config::get_auction_config(auctionhouse.clone());
    let set_config = auction_config::set_auction_config(auctionhouse.clone());
    let add_to_whitelist = whitelist::add_to_whitelist(auctionhouse.clone());
    let remove_from_whitelist = whitelist::remove_from_whitelist(auctionhouse.clone());
    let remove_bid = remove_bid::remove_bid(auctionhouse);
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "DELETE", "OPTIONS", "PUT", "PATCH"])
        .allow_headers(vec!["Origin", "Content-Type", "X-Auth-Token", "X-AppId"]);
    let routes_with_labels = warp::path!("api" / "v1" / ..).and(
        (create_bid.map(|reply| LabelledReply::new(reply, "create_bid")))
            .or(update_bid.map(|reply| LabelledReply::new(reply, "update_bid")))
            .unify()
            .or(cancel_bid.map(|reply| LabelledReply::new(reply, "cancel_bid")))
            .unify()
            .or(get_bid.map(|reply| LabelledReply::new(reply, "get_bid_by_id")))
            .unify()
            .or(get_node_operator.map(|reply| LabelledReply::new(reply, "get_node_operator")))
            .unify()
            .or(get_num_bids.map(|reply| LabelledReply::new(reply, "get_num_bids")))
            .unify()
            .or(get_winning_cluster
                .map(|reply| LabelledReply::new(reply, "get_winning_cluster")))
            .unify()
            .or(trigger_cluster.map(|reply| LabelledReply::new(reply, "trigger_cluster")))
            .unify()
            .or(get_cluster.map(|reply| LabelledReply::new(reply, "get_cluster_by_id")))
            .unify()
            .or(mark_deposited.map(|reply| LabelledReply::new(reply, "mark_deposited")))
            .unify()
            .or(clear_cluster.map(|reply| LabelledReply::new(reply, "clear_cluster")))
            .unify()
            .or(get_config.map(|reply| LabelledReply::new(reply, "get_auction_config")))
            .unify()
            .or(set_config.map(|reply| LabelledReply::new(reply, "set_auction_config")))
            .unify()
            .or(add_to_whitelist.map(|reply| LabelledReply::new(reply, "add_to_whitelist")))
            .unify()
            .or(remove_from_whitelist
                .map(|reply| LabelledReply::new(reply, "remove_from_whitelist")))
            .unify()
            .or(remove_bid.map(|reply| LabelledReply::new(reply, "remove_bid")))
            .unify(),
    );
    routes_with_labels
        .with(wrap_fn(move |f| wrap_metrics(f, metrics.clone())))
        .recover(handle_rejection)
        .with(cors)
}

// We turn Rejection into Reply to workaround warp not setting CORS headers on rejections.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, error("NotFound", "route not found"))
    } else if let Some(err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, error("InvalidFormat", err.to_string()))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            error("PayloadTooLarge", "request body too large"),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            error("MethodNotAllowed", "method not allowed"),
        )
    } else {
        tracing::warn!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, internal_error())
    };
    Ok(with_status(body, status))
}

fn wrap_metrics<F>(
    filter: F,
    metrics: Arc<Metrics>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    F: Filter<Extract = (LabelledReply,), Error = Rejection> + Clone + Send + Sync + 'static,
{
    warp::any()
        .and(start_request())
        .and(filter)
        .map(move |timer, reply| end_request(metrics.clone(), timer, reply))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Error<'a> {
    error_type: &'a str,
    description: &'a str,
}

fn error(error_type: &str, description: impl AsRef<str>) -> Json {
    json(&Error {
        error_type,
        description: description.as_ref(),
    })
}

fn internal_error() -> Json {
    json(&Error {
        error_type: "InternalServerError",
        description: "",
    })
}

/// Renders an engine error with the status code of its category.
pub fn convert_auction_error_to_reply(err: AuctionError) -> WithStatus<Json> {
    let status = match &err {
        AuctionError::DiscountRateTooHigh { .. }
        | AuctionError::DurationTooShort { .. }
        | AuctionError::InvalidGroup(_)
        | AuctionError::InsufficientPayment { .. }
        | AuctionError::AlreadyWhitelisted(_)
        | AuctionError::NotWhitelisted(_) => StatusCode::BAD_REQUEST,
        AuctionError::SenderNotBidder(_)
        | AuctionError::OnlyAllocator(_)
        | AuctionError::SenderNotAdmin(_) => StatusCode::FORBIDDEN,
        AuctionError::BidNotFound(_)
        | AuctionError::ClusterNotFound(_)
        | AuctionError::MainAuctionEmpty => StatusCode::NOT_FOUND,
        AuctionError::DuplicatedBid(_) | AuctionError::WrongClusterStatus(_) => {
            StatusCode::CONFLICT
        }
        AuctionError::NumericOverflow | AuctionError::Escrow(_) => {
            tracing::error!(?err, "internal auction error");
            return with_status(internal_error(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    with_status(error(error_type(&err), err.to_string()), status)
}

fn error_type(err: &AuctionError) -> &'static str {
    match err {
        AuctionError::DiscountRateTooHigh { .. } => "DiscountRateTooHigh",
        AuctionError::DurationTooShort { .. } => "DurationTooShort",
        AuctionError::InvalidGroup(_) => "InvalidGroup",
        AuctionError::InsufficientPayment { .. } => "InsufficientPayment",
        AuctionError::NumericOverflow => "NumericOverflow",
        AuctionError::SenderNotBidder(_) => "SenderNotBidder",
        AuctionError::OnlyAllocator(_) => "OnlyAllocator",
        AuctionError::SenderNotAdmin(_) => "SenderNotAdmin",
        AuctionError::AlreadyWhitelisted(_) => "AlreadyWhitelisted",
        AuctionError::NotWhitelisted(_) => "NotWhitelisted",
        AuctionError::MainAuctionEmpty => "MainAuctionEmpty",
        AuctionError::BidNotFound(_) => "BidNotFound",
        AuctionError::DuplicatedBid(_) => "DuplicatedBid",
        AuctionError::ClusterNotFound(_) => "ClusterNotFound",
        AuctionError::WrongClusterStatus(_) => "WrongClusterStatus",
        AuctionError::Escrow(_) => "EscrowFailure",
    }
}

#[cfg(test)]
async fn response_body(response: warp::hyper::Response<warp::hyper::Body>) -> Vec<u8> {
    let mut body = response.into_body();
    let mut result = Vec::new();
    while let Some(bytes) = futures::StreamExt::next(&mut body).await {
        result.extend_from_slice(bytes.unwrap().as_ref());
    }
    result
}

const MAX_JSON_BODY_PAYLOAD: u64 = 1024 * 16;

fn extract_payload<T: DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_JSON_BODY_PAYLOAD).and(warp::body::json())
}
