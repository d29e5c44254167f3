// Domain types shared by the controller and the views.

pub use app::ViewId;
pub use docker::{ContainerInfo, DockerSnapshot, ImageInfo, MainBuffer, ServiceInfo, VolumeInfo};
pub use panel::{MainPanelState, PanelContext, PanelKind, PanelState, PanelStates};

mod app;
mod docker;
mod panel;
