//! Events 핸들러
//!
//! 이벤트 CRUD와 참석 등록 엔드포인트입니다. 모든 작업이 AccessGate
//! 뒤에 있고, 특정 이벤트를 수정/삭제하는 작업은 추가로
//! OwnershipGate([moim_core::auth::authorize_owner])를 거칩니다.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use moim_core::auth::{authorize_owner, AccessKind};

use crate::db::{Event, EventFilter, EventStatus};
use crate::error::{ApiError, Result};
use crate::guard::CurrentUser;
use crate::state::AppState;

/// 이벤트 응답 본문
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: i64,
    pub attendees: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

impl EventResponse {
    fn new(event: Event, attendees: Vec<i64>) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            owner: event.owner_id,
            attendees,
            capacity: event.capacity,
        }
    }
}

/// 이벤트 생성 요청
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// 이벤트 부분 수정 요청
///
/// `capacity`는 필드 생략과 `null`을 구분합니다: 생략은 유지,
/// `null`은 정원 해제(무제한)입니다.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable_capacity")]
    pub capacity: Option<Option<i64>>,
}

fn nullable_capacity<'de, D>(deserializer: D) -> std::result::Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// 이벤트 목록 쿼리
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub owner: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<EventStatus>,
}

/// 참석 등록/취소 요청
#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub register: bool,
}

/// `GET /api/events`
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>> {
    let filter = EventFilter {
        owner: query.owner,
        start_date: query.start_date,
        end_date: query.end_date,
        status: query.status,
    };

    let events = state
        .db
        .list_events(&filter, Utc::now().date_naive())
        .await?;

    let mut responses = Vec::with_capacity(events.len());
    for event in events {
        let attendees = state.db.attendees(event.id).await?;
        responses.push(EventResponse::new(event, attendees));
    }
    Ok(Json(responses))
}

/// `POST /api/events`
///
/// 소유자는 항상 인증된 유저 본인입니다.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>)> {
    validate_dates(req.start_date, req.end_date)?;

    let id = state
        .db
        .create_event(
            &req.name,
            &req.description,
            req.start_date,
            req.end_date,
            user.id,
            req.capacity,
        )
        .await?;

    let event = state.db.event_by_id(id).await?.ok_or_else(not_found)?;
    Ok((StatusCode::CREATED, Json(EventResponse::new(event, vec![]))))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<EventResponse>> {
    let event = state.db.event_by_id(id).await?.ok_or_else(not_found)?;

    // 읽기는 소유자와 무관하게 허용
    authorize_owner(AccessKind::Read, user.id, event.owner_id)?;

    let attendees = state.db.attendees(event.id).await?;
    Ok(Json(EventResponse::new(event, attendees)))
}

/// `PATCH /api/events/{id}`
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>> {
    let mut event = state.db.event_by_id(id).await?.ok_or_else(not_found)?;

    authorize_owner(AccessKind::Mutate, user.id, event.owner_id)?;

    if let Some(name) = req.name {
        event.name = name;
    }
    if let Some(description) = req.description {
        event.description = description;
    }
    if let Some(start_date) = req.start_date {
        event.start_date = start_date;
    }
    if let Some(end_date) = req.end_date {
        event.end_date = end_date;
    }
    if let Some(capacity) = req.capacity {
        event.capacity = capacity;
    }

    // 병합 결과 기준으로 날짜 규칙 재검사
    validate_dates(event.start_date, event.end_date)?;

    state.db.update_event(&event).await?;
    let attendees = state.db.attendees(event.id).await?;
    Ok(Json(EventResponse::new(event, attendees)))
}

/// `DELETE /api/events/{id}`
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let event = state.db.event_by_id(id).await?.ok_or_else(not_found)?;

    authorize_owner(AccessKind::Mutate, user.id, event.owner_id)?;

    state.db.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/events/{id}/register`
///
/// `register` 플래그에 따라 인증된 유저를 참석자로 등록하거나
/// 등록을 취소합니다. 소유권 검사는 없습니다 (소유자 본인 등록만 금지).
pub async fn register_attendance(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Json<Value>> {
    let event = state.db.event_by_id(id).await?.ok_or_else(not_found)?;

    let is_attendee = state.db.is_attendee(event.id, user.id).await?;
    let attendee_count = state.db.attendee_count(event.id).await?;

    let action = registration_action(
        &event,
        user.id,
        is_attendee,
        attendee_count,
        req.register,
        Utc::now().date_naive(),
    )
    .map_err(|message| ApiError::BadRequest {
        message: message.to_string(),
    })?;

    let message = match action {
        RegistrationAction::Join => {
            state.db.add_attendee(event.id, user.id).await?;
            "Registered successfully."
        }
        RegistrationAction::Leave => {
            state.db.remove_attendee(event.id, user.id).await?;
            "Unregistered successfully."
        }
    };

    Ok(Json(serde_json::json!({"message": message})))
}

/// 참석 등록 결정
#[derive(Debug, PartialEq, Eq)]
enum RegistrationAction {
    Join,
    Leave,
}

/// 참석 등록 검증
///
/// 검사 순서: 과거 이벤트 → 소유자 본인 → 중복 등록 → 정원.
fn registration_action(
    event: &Event,
    user_id: i64,
    is_attendee: bool,
    attendee_count: i64,
    register: bool,
    today: NaiveDate,
) -> std::result::Result<RegistrationAction, &'static str> {
    if event.start_date < today {
        return Err("Cannot modify registration for past events.");
    }
    if user_id == event.owner_id {
        return Err("The owner of the event cannot register or unregister.");
    }

    if register {
        if is_attendee {
            return Err("User is already registered for this event.");
        }
        if let Some(capacity) = event.capacity {
            if attendee_count >= capacity {
                return Err("Event has reached maximum capacity.");
            }
        }
        Ok(RegistrationAction::Join)
    } else {
        if !is_attendee {
            return Err("User is not registered for this event.");
        }
        Ok(RegistrationAction::Leave)
    }
}

/// 시작일/종료일 규칙 검사
fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    if end_date < start_date {
        return Err(ApiError::BadRequest {
            message: "End date cannot be before start date.".to_string(),
        });
    }
    Ok(())
}

fn not_found() -> ApiError {
    ApiError::NotFound {
        message: "Event not found".to_string(),
    }
}
