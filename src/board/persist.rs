use std::collections::HashSet;

use eframe::egui::{Vec2, pos2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Argument, Aspect, Board, COEF_MAX, COEF_MIN, Center, DEFAULT_NODE_SIZE,
};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid project document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("project document has no options")]
    NoCenters,
    #[error("aspect {aspect:?} member ({center_id}, {node_index}) is out of range")]
    DanglingReference {
        aspect: String,
        center_id: usize,
        node_index: usize,
    },
    #[error("aspect {aspect:?} member ({center_id}, {node_index}) belongs to more than one aspect")]
    DuplicateMember {
        aspect: String,
        center_id: usize,
        node_index: usize,
    },
    #[error("aspect {aspect:?} has {count} members; at least two are required")]
    UndersizedAspect { aspect: String, count: usize },
}

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    agenda: String,
    centers: Vec<DocCenter>,
    #[serde(default)]
    aspects: Vec<DocAspect>,
}

#[derive(Serialize, Deserialize)]
struct DocCenter {
    x: f32,
    y: f32,
    coef: i32,
    label: String,
    nodes: Vec<DocNode>,
}

#[derive(Serialize, Deserialize)]
struct DocNode {
    x: f32,
    y: f32,
    coef: i32,
    label: String,
    angle: f32,
    distance: f32,
    #[serde(default, rename = "aspectId")]
    aspect_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct DocAspect {
    id: String,
    x: f32,
    y: f32,
    nodes: Vec<DocAspectMember>,
}

#[derive(Serialize, Deserialize)]
struct DocAspectMember {
    #[serde(rename = "centerId")]
    center_id: usize,
    #[serde(rename = "nodeIndex")]
    node_index: usize,
}

fn aspect_name(id: super::AspectId) -> String {
    format!("aspect-{}", id.0)
}

pub fn encode(board: &Board) -> Result<String, DocumentError> {
    let centers = board
        .centers
        .iter()
        .map(|center| DocCenter {
            x: center.pos.x,
            y: center.pos.y,
            coef: center.coef,
            label: center.label.clone(),
            nodes: center
                .arguments
                .iter()
                .map(|argument| DocNode {
                    x: argument.pos.x,
                    y: argument.pos.y,
                    coef: argument.coef,
                    label: argument.label.clone(),
                    angle: argument.angle,
                    distance: argument.distance,
                    aspect_id: argument.aspect.map(aspect_name),
                })
                .collect(),
        })
        .collect();

    let aspects = board
        .aspects
        .iter()
        .map(|aspect| DocAspect {
            id: aspect_name(aspect.id),
            x: aspect.pos.x,
            y: aspect.pos.y,
            nodes: aspect
                .members
                .iter()
                .filter_map(|member| board.locate(*member))
                .map(|(center_id, node_index)| DocAspectMember {
                    center_id,
                    node_index,
                })
                .collect(),
        })
        .collect();

    let document = Document {
        agenda: board.agenda.clone(),
        centers,
        aspects,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn decode(raw: &str, view: Vec2) -> Result<Board, DocumentError> {
    let document: Document = serde_json::from_str(raw)?;
    if document.centers.is_empty() {
        return Err(DocumentError::NoCenters);
    }

    let mut board = Board::empty(view);
    board.agenda = document.agenda;

    for doc_center in &document.centers {
        let id = board.alloc_center_id();
        let mut arguments = Vec::with_capacity(doc_center.nodes.len());
        for (index, doc_node) in doc_center.nodes.iter().enumerate() {
            arguments.push(Argument {
                id: board.alloc_argument_id(),
                pos: pos2(doc_node.x, doc_node.y),
                vel: Vec2::ZERO,
                coef: doc_node.coef.clamp(COEF_MIN, COEF_MAX),
                label: doc_node.label.clone(),
                angle: doc_node.angle,
                distance: doc_node.distance,
                aspect: None,
                z: 10 + index as i32,
                size: DEFAULT_NODE_SIZE,
            });
        }
        board.centers.push(Center {
            id,
            pos: pos2(doc_center.x, doc_center.y),
            vel: Vec2::ZERO,
            coef: doc_center.coef,
            label: doc_center.label.clone(),
            arguments,
            z: 100,
            size: DEFAULT_NODE_SIZE,
        });
    }

    let mut claimed: HashSet<(usize, usize)> = HashSet::new();
    for doc_aspect in &document.aspects {
        if doc_aspect.nodes.len() < 2 {
            return Err(DocumentError::UndersizedAspect {
                aspect: doc_aspect.id.clone(),
                count: doc_aspect.nodes.len(),
            });
        }
        let id = board.alloc_aspect_id();
        let mut members = Vec::with_capacity(doc_aspect.nodes.len());
        for doc_member in &doc_aspect.nodes {
            let Some(argument) = board
                .centers
                .get(doc_member.center_id)
                .and_then(|center| center.arguments.get(doc_member.node_index))
            else {
                return Err(DocumentError::DanglingReference {
                    aspect: doc_aspect.id.clone(),
                    center_id: doc_member.center_id,
                    node_index: doc_member.node_index,
                });
            };
            if !claimed.insert((doc_member.center_id, doc_member.node_index)) {
                return Err(DocumentError::DuplicateMember {
                    aspect: doc_aspect.id.clone(),
                    center_id: doc_member.center_id,
                    node_index: doc_member.node_index,
                });
            }
            members.push(argument.id);
        }
        for member in &members {
            if let Some(argument) = board.argument_mut(*member) {
                argument.aspect = Some(id);
            }
        }
        board.aspects.push(Aspect {
            id,
            members,
            pos: pos2(doc_aspect.x, doc_aspect.y),
            vel: Vec2::ZERO,
            animation: None,
        });
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use eframe::egui::vec2;

    use super::super::test_support::board_with;
    use super::super::{Selection, aspect, physics};
    use super::*;

    const VIEW: Vec2 = vec2(1200.0, 800.0);

    fn sample_board() -> Board {
        let mut board = board_with(VIEW, &[2, 1]);
        board.agenda = "Buy the house?".to_owned();
        board.centers[0].label = "Yes".to_owned();
        board.centers[1].label = "No".to_owned();
        board.centers[0].arguments[0].coef = 4;
        board.centers[0].arguments[0].label = "Garden".to_owned();
        board.centers[0].arguments[1].coef = -2;
        board.centers[1].arguments[0].coef = 3;

        let first = board.centers[0].arguments[1].id;
        let second = board.centers[1].arguments[0].id;
        board.selection = Selection::Arguments(vec![first, second]);
        aspect::merge(&mut board).unwrap();
        for _ in 0..70 {
            physics::step(&mut board);
        }
        board
    }

    fn membership_partition(board: &Board) -> BTreeSet<BTreeSet<(usize, usize)>> {
        board
            .aspects
            .iter()
            .map(|aspect| {
                aspect
                    .members
                    .iter()
                    .filter_map(|member| board.locate(*member))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_the_graph() {
        let board = sample_board();
        let json = encode(&board).unwrap();
        let loaded = decode(&json, VIEW).unwrap();

        assert_eq!(loaded.agenda, board.agenda);
        assert_eq!(loaded.centers.len(), board.centers.len());
        for (original, copy) in board.centers.iter().zip(&loaded.centers) {
            assert_eq!(copy.label, original.label);
            assert_eq!(copy.arguments.len(), original.arguments.len());
            for (a, b) in original.arguments.iter().zip(&copy.arguments) {
                assert_eq!(b.label, a.label);
                assert_eq!(b.coef, a.coef);
                assert!((b.angle - a.angle).abs() < 1e-5);
                assert!((b.distance - a.distance).abs() < 1e-3);
            }
        }
        assert_eq!(membership_partition(&loaded), membership_partition(&board));
    }

    #[test]
    fn legacy_documents_without_agenda_or_aspects_load() {
        let raw = r#"{
            "centers": [
                { "x": 400.0, "y": 300.0, "coef": 0, "label": "Do it",
                  "nodes": [
                    { "x": 500.0, "y": 250.0, "coef": 9, "label": "Fast",
                      "angle": 0.5, "distance": 170.0 }
                  ] }
            ]
        }"#;
        let board = decode(raw, VIEW).unwrap();
        assert_eq!(board.agenda, "");
        assert!(board.aspects.is_empty());
        assert_eq!(board.centers[0].arguments[0].coef, COEF_MAX);
    }

    #[test]
    fn garbage_fails_with_a_parse_error() {
        let error = decode("{ not json", VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::Parse(_)));
        let error = decode(r#"{ "agenda": "x" }"#, VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::Parse(_)));
    }

    #[test]
    fn out_of_range_member_fails_the_whole_load() {
        let board = sample_board();
        let mut json: serde_json::Value = serde_json::from_str(&encode(&board).unwrap()).unwrap();
        json["aspects"][0]["nodes"][0]["nodeIndex"] = 99.into();
        let error = decode(&json.to_string(), VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::DanglingReference { .. }));
    }

    #[test]
    fn doubly_claimed_member_fails_the_whole_load() {
        let board = sample_board();
        let mut json: serde_json::Value = serde_json::from_str(&encode(&board).unwrap()).unwrap();
        let duplicate = json["aspects"][0].clone();
        json["aspects"].as_array_mut().unwrap().push(duplicate);
        let error = decode(&json.to_string(), VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::DuplicateMember { .. }));
    }

    #[test]
    fn undersized_aspect_fails_the_whole_load() {
        let board = sample_board();
        let mut json: serde_json::Value = serde_json::from_str(&encode(&board).unwrap()).unwrap();
        json["aspects"][0]["nodes"]
            .as_array_mut()
            .unwrap()
            .truncate(1);
        let error = decode(&json.to_string(), VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::UndersizedAspect { .. }));
    }

    #[test]
    fn empty_documents_are_rejected() {
        let error = decode(r#"{ "centers": [] }"#, VIEW).unwrap_err();
        assert!(matches!(error, DocumentError::NoCenters));
    }
}
