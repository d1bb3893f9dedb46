//! UIコンポーネントモジュール

pub mod link_interceptor;
pub mod link_notice;
pub mod tooltip;

pub use link_interceptor::LinkInterceptor;
pub use link_notice::link_sink;
