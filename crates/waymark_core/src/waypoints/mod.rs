pub mod route_edit_session;
pub mod waypoint_editor;
