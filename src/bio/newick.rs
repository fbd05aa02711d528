/// Newick tree parsing and leaf distance queries
use crate::{Result, TerpenomeError};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair, preceded},
    IResult,
};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: Option<String>,
    pub branch_length: f64,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree stored as an arena of nodes in pre-order
#[derive(Debug, Clone)]
pub struct NewickTree {
    nodes: Vec<TreeNode>,
}

/// Intermediate recursive form produced by the parser
struct ParsedNode {
    name: Option<String>,
    length: Option<f64>,
    children: Vec<ParsedNode>,
}

fn quoted_label(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        |s: &str| s.to_string(),
    )(input)
}

fn unquoted_label(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !c.is_whitespace() && !"():;,[]'".contains(c)),
        |s: &str| s.to_string(),
    )(input)
}

fn branch_length(input: &str) -> IResult<&str, f64> {
    preceded(pair(char(':'), multispace0), double)(input)
}

fn subtree(input: &str) -> IResult<&str, ParsedNode> {
    let (input, _) = multispace0(input)?;
    let (input, children) = opt(delimited(
        char('('),
        separated_list1(char(','), subtree),
        preceded(multispace0, char(')')),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = opt(alt((quoted_label, unquoted_label)))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, length) = opt(branch_length)(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        ParsedNode {
            name,
            length,
            children: children.unwrap_or_default(),
        },
    ))
}

impl NewickTree {
    /// Parse the first tree of a Newick string
    pub fn parse(input: &str) -> Result<Self> {
        let (rest, root) = subtree(input)
            .map_err(|e| TerpenomeError::Parse(format!("Failed to parse Newick tree: {:?}", e)))?;
        let rest = rest.trim_start();
        let rest = rest.strip_prefix(';').ok_or_else(|| {
            TerpenomeError::Parse(format!(
                "Expected ';' at end of Newick tree, found '{}'",
                rest.chars().take(20).collect::<String>()
            ))
        })?;
        if !rest.trim().is_empty() {
            tracing::debug!("Ignoring trailing content after first Newick tree");
        }

        let mut tree = NewickTree { nodes: Vec::new() };
        tree.push(root, None);
        Ok(tree)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn push(&mut self, parsed: ParsedNode, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TreeNode {
            name: parsed.name,
            branch_length: parsed.length.unwrap_or(0.0),
            parent,
            children: Vec::new(),
        });
        for child in parsed.children {
            let child_index = self.push(child, Some(index));
            self.nodes[index].children.push(child_index);
        }
        index
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Leaf indices in left-to-right order
    pub fn leaves(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_leaf())
            .collect()
    }

    pub fn leaf_names(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter_map(|i| self.nodes[i].name.as_deref())
            .collect()
    }

    /// Patristic distance: sum of branch lengths on the path between two nodes
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let mut ancestors_of_a = HashMap::new();
        let mut current = Some(a);
        let mut travelled = 0.0;
        while let Some(index) = current {
            ancestors_of_a.insert(index, travelled);
            travelled += self.nodes[index].branch_length;
            current = self.nodes[index].parent;
        }

        let mut current = Some(b);
        let mut travelled = 0.0;
        while let Some(index) = current {
            if let Some(from_a) = ancestors_of_a.get(&index) {
                return from_a + travelled;
            }
            travelled += self.nodes[index].branch_length;
            current = self.nodes[index].parent;
        }

        // Every node shares the root, so this is unreachable for a single tree
        f64::INFINITY
    }

    /// Names of the first leaf of each adjacent leaf pair within `cutoff` of each other
    pub fn adjacent_duplicates(&self, cutoff: f64) -> Vec<String> {
        let leaves = self.leaves();
        leaves
            .windows(2)
            .filter(|pair| self.distance(pair[0], pair[1]) <= cutoff)
            .filter_map(|pair| self.nodes[pair[0]].name.clone())
            .collect()
    }
}
