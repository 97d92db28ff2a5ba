use crate::context::AppContext;
use crate::error::DashboardError;

use spirit_client::client::operation;
use spirit_client::{Recovered, RequestOptions};

use models::{BirthData, BookQueryRequest, ChatRequest, ServiceId, TarotReadingRequest};

use log::{info, warn};
use serde_json::{Value, json};

fn recovered_output(recovered: Recovered) -> Value {
    match recovered {
        Recovered::Live(response) => json!({ "offline": false, "data": response.data }),
        Recovered::Fallback { data, error } => {
            warn!("Showing offline content: {}", error.guidance);
            json!({
                "offline": true,
                "data": data,
                "error": {
                    "kind": error.kind,
                    "message": error.message,
                    "guidance": error.guidance,
                }
            })
        }
    }
}

pub async fn models(ctx: &AppContext) -> Result<Value, DashboardError> {
    let response = ctx
        .client
        .request_with_retry(
            ServiceId::SpiritualApi.key(),
            "models",
            RequestOptions::get(),
            operation::FETCH_MODELS,
        )
        .await?;
    Ok(response.data)
}

pub async fn tarot(
    ctx: &AppContext,
    question: String,
    spread: String,
    deck: String,
    fallback: bool,
) -> Result<Value, DashboardError> {
    info!("Drawing a {spread} reading");
    let reading = TarotReadingRequest::new(question)
        .with_spread(spread)
        .with_deck(deck);

    if fallback {
        let recovered = ctx
            .client
            .request_with_fallback(
                ServiceId::Tarot.key(),
                "reading",
                RequestOptions::post_json(&reading)?,
                operation::FETCH_TAROT_READING,
            )
            .await?;
        return Ok(recovered_output(recovered));
    }

    Ok(ctx.client.tarot_reading(&reading).await?.data)
}

pub async fn chart(
    ctx: &AppContext,
    date: String,
    time: String,
    location: String,
    fallback: bool,
) -> Result<Value, DashboardError> {
    let birth = BirthData::new(date, time, location);

    if fallback {
        let recovered = ctx
            .client
            .request_with_fallback(
                ServiceId::Astrology.key(),
                "birthChart",
                RequestOptions::post_json(&birth)?,
                operation::GENERATE_CHART,
            )
            .await?;
        return Ok(recovered_output(recovered));
    }

    Ok(ctx.client.birth_chart(&birth).await?.data)
}

pub async fn books(ctx: &AppContext, query: String, category: String) -> Result<Value, DashboardError> {
    let request = BookQueryRequest::new(query).with_category(category);
    let response = ctx
        .client
        .request_with_retry(
            ServiceId::BookChat.key(),
            "query",
            RequestOptions::post_json(&request)?,
            operation::QUERY_BOOKS,
        )
        .await?;
    Ok(response.data)
}

pub async fn chat(ctx: &AppContext, message: String) -> Result<Value, DashboardError> {
    Ok(ctx.client.spiritual_chat(&ChatRequest::new(message)).await?.data)
}
