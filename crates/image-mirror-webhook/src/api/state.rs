use crate::mutation::RegistryMirror;

pub(crate) struct ApiServerState {
    /// `None` when the routing configuration is incomplete: every
    /// mutation request is then refused with a server error.
    pub(crate) mirror: Option<RegistryMirror>,
}
