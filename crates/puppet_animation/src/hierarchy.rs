use glam::Mat4;

/// One joint of the skeleton hierarchy.
///
/// Children are owned by value, so the tree is acyclic by construction and
/// read-only once it is shared behind an `Arc` by the clips of a rig.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneNode {
    pub name: String,
    /// Bind-pose transform relative to the parent node.
    pub transform: Mat4,
    pub children: Vec<BoneNode>,
}

impl BoneNode {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    /// Builder helper: appends `child` and returns `self`.
    #[must_use]
    pub fn with_child(mut self, child: BoneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: BoneNode) -> &mut BoneNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Depth-first, parent-before-children iteration.
    pub fn iter(&self) -> impl Iterator<Item = &BoneNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&BoneNode> {
        self.iter().find(|node| node.name == name)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(BoneNode::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> BoneNode {
        BoneNode::new("root", Mat4::IDENTITY)
            .with_child(
                BoneNode::new("spine", Mat4::IDENTITY).with_child(BoneNode::new("head", Mat4::IDENTITY)),
            )
            .with_child(BoneNode::new("leg", Mat4::IDENTITY))
    }

    #[test]
    fn iter_is_preorder() {
        let tree = sample_tree();
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["root", "spine", "head", "leg"]);
    }

    #[test]
    fn find_and_counts() {
        let tree = sample_tree();
        assert!(tree.find("head").is_some());
        assert!(tree.find("tail").is_none());
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
    }
}
