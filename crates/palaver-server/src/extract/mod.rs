mod request_context;
mod session_viewer;

pub use self::request_context::RequestContext;
pub use self::session_viewer::SessionViewer;
