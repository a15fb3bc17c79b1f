use crate::{api::convert_auction_error_to_reply, auctionhouse::Auctionhouse};
use auction::error::AuctionError;
use model::{Bid, BidId};
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_bid_by_id_request() -> impl Filter<Extract = (BidId,), Error = Rejection> + Clone {
    warp::path!("bids" / BidId).and(warp::get())
}

fn get_bid_by_id_response(result: Result<Bid, AuctionError>) -> impl Reply {
    match result {
        Ok(bid) => reply::with_status(reply::json(&bid), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn get_bid_by_id(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_bid_by_id_request().and_then(move |id| {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.bid_details(&id).await;
            Result::<_, Infallible>::Ok(get_bid_by_id_response(result))
        }
    })
}
