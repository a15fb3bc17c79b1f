use crate::{
    api::{convert_auction_error_to_reply, extract_payload},
    auctionhouse::Auctionhouse,
};
use auction::error::AuctionError;
use model::{BidId, BidUpdate};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn update_bid_request() -> impl Filter<Extract = (BidId, BidUpdate), Error = Rejection> + Clone {
    warp::path!("bids" / BidId)
        .and(warp::patch())
        .and(extract_payload())
}

fn update_bid_response(result: Result<BidId, AuctionError>) -> impl Reply {
    match result {
        Ok(id) => reply::with_status(reply::json(&id), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn update_bid(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    update_bid_request().and_then(move |id, update| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.update_bid(id, update).await;
            Result::<_, Infallible>::Ok(update_bid_response(result))
        }
    })
}
