//! Room creation, membership and join-code handlers.

use axum::extract::{Path, State};
use axum::Json;

use ips_core::{EchoResponse, JoinCode, Room, RoomId};

use crate::error::ApiError;
use crate::rooms::IssuedJoinCode;
use crate::schema::rooms::{parse_user, CreateRoomRequest, CreateRoomResponse, JoinRoomRequest};
use crate::state::AppState;

/// Creates a room owned by the sharer in the body.
///
/// `POST /`
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let sharer = parse_user(&req.uuid)?;
    let room = state.rooms.create(sharer);
    tracing::info!(room_id = %room.room_id, "room created for sharer {}", sharer);
    let created_at = room.created_at;
    Ok(Json(EchoResponse::ok_at(room, created_at)))
}

/// `GET /rooms/{room_id}`
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room_id: RoomId = room_id.parse()?;
    Ok(Json(state.rooms.get(&room_id)?))
}

/// `POST /rooms/{room_id}/members`
pub async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    let room_id: RoomId = room_id.parse()?;
    let user = parse_user(&req.uuid)?;
    Ok(Json(state.rooms.join(&room_id, user)?))
}

/// `DELETE /rooms/{room_id}/members/{uuid}`
pub async fn leave_room(
    State(state): State<AppState>,
    Path((room_id, user)): Path<(String, String)>,
) -> Result<Json<Room>, ApiError> {
    let room_id: RoomId = room_id.parse()?;
    let user = parse_user(&user)?;
    Ok(Json(state.rooms.leave(&room_id, &user)?))
}

/// Issues a join code for a live room.
///
/// `POST /rooms/{room_id}/join-code`
pub async fn issue_join_code(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<IssuedJoinCode>, ApiError> {
    let room_id: RoomId = room_id.parse()?;
    state.rooms.get(&room_id)?;
    Ok(Json(state.join_codes.issue(room_id)?))
}

/// Resolves a live join code to its room.
///
/// `GET /join/{code}`
pub async fn resolve_join_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let code: JoinCode = code.parse()?;
    let room_id = state.join_codes.resolve(&code)?;
    Ok(Json(state.rooms.get(&room_id)?))
}
