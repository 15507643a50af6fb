use shakmaty::{Board, Color, Role, Square};

/// One value per square, in square-index order (rank 1 to rank 8, file a to h)
pub type EncodedBoard = [i8; 64];

/// Signed piece value: magnitude is the piece kind, sign is the color
pub fn piece_value(role: Role, color: Color) -> i8 {
    let value = match role {
        Role::Pawn => 1,
        Role::Knight => 2,
        Role::Bishop => 3,
        Role::Rook => 4,
        Role::Queen => 5,
        Role::King => 6,
    };

    match color {
        Color::White => value,
        Color::Black => -value,
    }
}

/// +1 if white is to move, -1 if black is to move
pub fn turn_sign(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Encodes a board into its signed matrix representation, one i8 per square
pub fn encode_board(board: &Board) -> EncodedBoard {
    let mut encoded = [0i8; 64];

    for square in Square::ALL {
        if let Some(piece) = board.piece_at(square) {
            encoded[square as usize] = piece_value(piece.role, piece.color);
        }
    }

    encoded
}
