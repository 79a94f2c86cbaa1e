//! Iterative depth-first traversal over element nodes.

use roxmltree::Node;

/// Traversal event for one element.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Event<'a, 'input> {
    /// First visit, before any children
    Enter(Node<'a, 'input>),
    /// All children visited; only sent for nodes that returned [`Visit::Descend`]
    Exit(Node<'a, 'input>),
}

/// What the walk does after an `Enter` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Visit {
    Descend,
    /// Skip every descendant; no `Exit` event follows
    SkipChildren,
}

/// Walks the element subtree rooted at `root` in document order.
///
/// The handler's return value on `Exit` is ignored. The first error aborts
/// the walk.
pub(crate) fn walk<'a, 'input, E, F>(root: Node<'a, 'input>, mut handler: F) -> Result<(), E>
where
    F: FnMut(Event<'a, 'input>) -> Result<Visit, E>,
{
    if handler(Event::Enter(root))? == Visit::SkipChildren {
        return Ok(());
    }

    let mut stack = vec![(root, root.children())];

    loop {
        let Some((parent, children)) = stack.last_mut() else {
            break;
        };
        let parent = *parent;

        match children.find(Node::is_element) {
            Some(child) => {
                if handler(Event::Enter(child))? == Visit::Descend {
                    stack.push((child, child.children()));
                }
            }
            None => {
                stack.pop();
                handler(Event::Exit(parent))?;
            }
        }
    }

    Ok(())
}
