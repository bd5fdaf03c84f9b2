use crate::graph::GraphCore;

/// Identity of an attachable algorithm extension. Attachment is
/// idempotent per id.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ExtensionId {
    Outerplanar,
    SearchK23,
    SearchK33,
    SearchK4,
    Draw,
}

/// Hooks an extension installs on the graph store.
///
/// Extensions form an ordered chain on [`crate::graph::Graph`]; the last
/// one attached runs last. Hook timing relative to the core operation:
///
/// - `on_init` / `on_reinit`: after the core arrays are (re)built, so
///   side tables can size themselves from the final capacities.
/// - `on_hide_edge`: before the core unlinks the arc pair, while the
///   adjacency context is still intact.
/// - `on_restore_edge`: after the core has relinked the arc pair.
/// - `on_identify_vertices`: after the core splice, with `(u, v)` the
///   surviving and absorbed vertex.
/// - `on_restore_vertex`: after the core has undone the identification
///   or un-hidden the vertex.
///
/// All hooks default to no-ops; extensions override only what they
/// track.
pub trait GraphExtension {
    fn id(&self) -> ExtensionId;

    /// True if the extension keeps side tables indexed by arc slot and
    /// therefore cannot survive `ensure_arc_capacity` growth.
    fn forbids_arc_growth(&self) -> bool {
        false
    }

    /// Downcast access for extensions that expose computed results
    /// (e.g. the drawing extension). `None` for stateless markers.
    fn as_any(&self) -> Option<&dyn std::any::Any> {
        None
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        None
    }

    fn on_init(&mut self, _core: &mut GraphCore) {}
    fn on_reinit(&mut self, _core: &mut GraphCore) {}
    fn on_hide_edge(&mut self, _core: &mut GraphCore, _arc: usize) {}
    fn on_restore_edge(&mut self, _core: &mut GraphCore, _arc: usize) {}
    fn on_identify_vertices(&mut self, _core: &mut GraphCore, _u: usize, _v: usize) {}
    fn on_restore_vertex(&mut self, _core: &mut GraphCore, _v: usize) {}

    /// Deep copy of the extension state, for [`crate::graph::Graph::duplicate`].
    fn dup(&self) -> Box<dyn GraphExtension>;
}
