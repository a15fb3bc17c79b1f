use crate::{api::convert_auction_error_to_reply, auctionhouse::Auctionhouse};
use auction::error::AuctionError;
use model::VirtualCluster;
use std::{convert::Infallible, sync::Arc};
use warp::{hyper::StatusCode, reply, Filter, Rejection, Reply};

fn get_winning_cluster_request() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path!("auction" / "winner").and(warp::get())
}

fn get_winning_cluster_response(result: Result<VirtualCluster, AuctionError>) -> impl Reply {
    match result {
        Ok(cluster) => reply::with_status(reply::json(&cluster), StatusCode::OK),
        Err(err) => convert_auction_error_to_reply(err),
    }
}

pub fn get_winning_cluster(
    auctionhouse: Arc<Auctionhouse>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    get_winning_cluster_request().and_then(move || {
        let auctionhouse = auctionhouse.clone();
        async move {
            let result = auctionhouse.winning_cluster().await;
            Result::<_, Infallible>::Ok(get_winning_cluster_response(result))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::test::request;

    #[tokio::test]
    async fn get_winning_cluster_request_matches() {
        let filter = get_winning_cluster_request();
        assert!(request()
            .path("/auction/winner")
            .method("GET")
            .matches(&filter)
            .await);
    }

    #[tokio::test]
    async fn empty_auction_is_not_found() {
        let response =
            get_winning_cluster_response(Err(AuctionError::MainAuctionEmpty)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
