//! Directed graphs over named, attributed vertices.

use std::collections::BTreeMap;

use crate::faults::{Fault, FaultKind};
use crate::inspect::equals;
use crate::value::Value;

/// A graph vertex: a name plus string-keyed attributes.
///
/// Vertices compare equal by name only; attributes are scratch space for algorithms (colors, times, ...).
#[derive(Debug, Clone)]
pub struct Vertex {
    name: String,
    attributes: BTreeMap<String, Value>,
}

impl Vertex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute initialisation.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// ## Errors
    /// - `VertexAttributeError` if the attribute was never set.
    pub fn get(&self, attribute: &str) -> Result<&Value, Fault> {
        self.attributes.get(attribute).ok_or_else(|| {
            let available: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
            Fault::new(
                FaultKind::VertexAttributeError,
                format!(
                    "vertex {} does not have attribute {attribute}, available attributes: [{}]",
                    self.name,
                    available.join(", ")
                ),
            )
        })
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn attribute_values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.attributes.values_mut()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Vertex {}

#[derive(Debug, Clone)]
struct Edge {
    dest: usize,
    weight: Option<Value>,
}

/// A directed graph with optional edge weights.
///
/// Vertices enumerate in insertion order; each vertex's adjacency enumerates in edge-insertion order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex. Re-adding an existing name replaces the vertex and clears its out-edges.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        match self.index_of(vertex.name()) {
            Some(at) => {
                self.vertices[at] = vertex;
                self.adjacency[at].clear();
            }
            None => {
                self.vertices.push(vertex);
                self.adjacency.push(Vec::new());
            }
        }
    }

    /// Add (or re-weight) the edge `source -> dest`.
    ///
    /// ## Errors
    /// - `GraphVertexError` if either endpoint is not in the graph.
    pub fn add_edge(&mut self, source: &str, dest: &str, weight: Option<Value>) -> Result<(), Fault> {
        let (from, to) = self.endpoints(source, dest)?;
        let edges = &mut self.adjacency[from];
        match edges.iter_mut().find(|e| e.dest == to) {
            Some(edge) => edge.weight = weight,
            None => edges.push(Edge { dest: to, weight }),
        }
        Ok(())
    }

    /// Vertices adjacent to `vertex`, in edge-insertion order.
    pub fn adj(&self, vertex: &str) -> Result<Vec<&Vertex>, Fault> {
        let from = self.require(vertex)?;
        Ok(self.adjacency[from].iter().map(|e| &self.vertices[e.dest]).collect())
    }

    /// Weight of `source -> dest`; `Ok(None)` for an unweighted edge.
    ///
    /// ## Errors
    /// - `GraphVertexError` if either endpoint is missing.
    /// - `GraphEdgeError` if there is no such edge.
    pub fn weight(&self, source: &str, dest: &str) -> Result<Option<&Value>, Fault> {
        let (from, to) = self.endpoints(source, dest)?;
        self.adjacency[from]
            .iter()
            .find(|e| e.dest == to)
            .map(|e| e.weight.as_ref())
            .ok_or_else(|| {
                Fault::new(
                    FaultKind::GraphEdgeError,
                    format!(
                        "graph does not have an edge from a vertex with name {source} to a vertex with name {dest}"
                    ),
                )
            })
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.index_of(name).map(|at| &self.vertices[at])
    }

    pub fn vertex_mut(&mut self, name: &str) -> Option<&mut Vertex> {
        let at = self.index_of(name)?;
        Some(&mut self.vertices[at])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        let attrs = self.vertices.iter_mut().flat_map(Vertex::attribute_values_mut);
        let weights = self
            .adjacency
            .iter_mut()
            .flat_map(|edges| edges.iter_mut().filter_map(|e| e.weight.as_mut()));
        attrs.chain(weights)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, Fault> {
        self.index_of(name).ok_or_else(|| {
            Fault::new(
                FaultKind::GraphVertexError,
                format!("graph does not have vertex with name {name}"),
            )
        })
    }

    fn endpoints(&self, source: &str, dest: &str) -> Result<(usize, usize), Fault> {
        Ok((self.require(source)?, self.require(dest)?))
    }
}

/// Native graph equality: same vertices (names and attributes) in the same order, same edges in the same
/// order with equal weights.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        if self.vertices.len() != other.vertices.len() {
            return false;
        }
        let same_vertices = self.vertices.iter().zip(&other.vertices).all(|(a, b)| {
            a.name == b.name
                && a.attributes.len() == b.attributes.len()
                && a
                    .attributes
                    .iter()
                    .zip(&b.attributes)
                    .all(|((ka, va), (kb, vb))| ka == kb && equals(va, vb))
        });
        same_vertices
            && self.adjacency.iter().zip(&other.adjacency).all(|(ea, eb)| {
                ea.len() == eb.len()
                    && ea.iter().zip(eb).all(|(x, y)| {
                        x.dest == y.dest
                            && match (&x.weight, &y.weight) {
                                (None, None) => true,
                                (Some(wx), Some(wy)) => equals(wx, wy),
                                _ => false,
                            }
                    })
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new();
        for name in ["a", "b", "c"] {
            g.add_vertex(Vertex::new(name));
        }
        g.add_edge("a", "c", None).unwrap();
        g.add_edge("a", "b", Some(Value::Int(4))).unwrap();
        g.add_edge("b", "c", Some(Value::Float(0.5))).unwrap();
        g
    }

    #[test]
    fn adjacency_keeps_edge_insertion_order() {
        let g = triangle();
        let names: Vec<&str> = g.adj("a").unwrap().into_iter().map(Vertex::name).collect();
        assert_eq!(names, ["c", "b"]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn weight_lookup_distinguishes_missing_vertices_and_edges() {
        let g = triangle();
        assert!(g.weight("a", "c").unwrap().is_none());
        assert_eq!(g.weight("c", "a").unwrap_err().kind, FaultKind::GraphEdgeError);
        assert_eq!(g.weight("a", "z").unwrap_err().kind, FaultKind::GraphVertexError);
    }

    #[test]
    fn vertex_attributes_fault_when_missing() {
        let v = Vertex::new("a").with("color", "red");
        assert!(v.get("color").is_ok());
        let err = v.get("colour").unwrap_err();
        assert_eq!(err.kind, FaultKind::VertexAttributeError);
        assert!(err.message.ends_with("available attributes: [color]"));
        assert_eq!(Vertex::new("a"), v);
    }

    #[test]
    fn native_equality_sees_attribute_changes() {
        let g = triangle();
        let mut h = g.clone();
        assert_eq!(g, h);
        h.vertex_mut("b").unwrap().set("color", "black");
        assert_ne!(g, h);
    }
}
